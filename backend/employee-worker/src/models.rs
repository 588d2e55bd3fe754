use serde::{Deserialize, Deserializer};

/// Envelope returned by the employee API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<Employee>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub employee_name: String,
    #[serde(deserialize_with = "integer_or_string")]
    pub employee_salary: i64,
    #[serde(deserialize_with = "integer_or_string")]
    pub employee_age: i64,
    #[serde(default)]
    pub profile_image: String,
}

impl Employee {
    /// Salary divided by age (integer division). `None` when age is not positive.
    pub fn average_salary(&self) -> Option<i64> {
        if self.employee_age <= 0 {
            return None;
        }
        Some(self.employee_salary / self.employee_age)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

fn integer_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(n) => Ok(n),
        StringOrNumber::Float(n) => Ok(n as i64),
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
