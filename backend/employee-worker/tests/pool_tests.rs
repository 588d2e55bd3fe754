use std::collections::HashSet;
use std::time::Duration;

use employee_worker::client::decode_response;
use employee_worker::{run_pool, Employee, PoolConfig};

fn sample_employees(n: u32) -> Vec<Employee> {
    (1..=n)
        .map(|i| Employee {
            id: i.to_string(),
            employee_name: format!("Employee {}", i),
            employee_salary: 1000 * i as i64,
            employee_age: 20 + i as i64,
            profile_image: String::new(),
        })
        .collect()
}

#[tokio::test]
async fn every_employee_processed_exactly_once() {
    // GIVEN: more jobs than workers
    let employees = sample_employees(24);
    let config = PoolConfig {
        workers: 9,
        delay: Duration::ZERO,
    };

    // WHEN: the pool runs
    let reports = run_pool(employees, &config).await;

    // THEN: one report per employee, no duplicates
    assert_eq!(reports.len(), 24);
    let ids: HashSet<_> = reports.iter().map(|r| r.employee_id.clone()).collect();
    assert_eq!(ids.len(), 24);
    assert!(reports.iter().all(|r| (1..=9).contains(&r.worker_id)));
}

#[tokio::test]
async fn averages_use_integer_division() {
    let reports = run_pool(
        sample_employees(3),
        &PoolConfig {
            workers: 2,
            delay: Duration::ZERO,
        },
    )
    .await;

    let by_id = |id: &str| reports.iter().find(|r| r.employee_id == id).unwrap();
    assert_eq!(by_id("1").average_salary, Some(1000 / 21));
    assert_eq!(by_id("2").average_salary, Some(2000 / 22));
    assert_eq!(by_id("3").average_salary, Some(3000 / 23));
}

#[tokio::test]
async fn zero_age_does_not_abort_the_run() {
    let mut employees = sample_employees(2);
    employees[0].employee_age = 0;

    let reports = run_pool(
        employees,
        &PoolConfig {
            workers: 4,
            delay: Duration::ZERO,
        },
    )
    .await;

    assert_eq!(reports.len(), 2);
    let zero = reports.iter().find(|r| r.employee_id == "1").unwrap();
    assert_eq!(zero.average_salary, None);
}

#[tokio::test]
async fn decoded_payload_feeds_the_pool() {
    let body = br#"{
        "status": "success",
        "data": [
            {"id": 1, "employee_name": "Tiger Nixon", "employee_salary": 320800, "employee_age": 61, "profile_image": ""},
            {"id": 2, "employee_name": "Garrett Winters", "employee_salary": 170750, "employee_age": 63, "profile_image": ""}
        ],
        "message": "Successfully! All records has been fetched."
    }"#;
    let employees = decode_response(body).unwrap();

    let reports = run_pool(
        employees,
        &PoolConfig {
            workers: 9,
            delay: Duration::from_millis(1),
        },
    )
    .await;

    assert_eq!(reports.len(), 2);
    let tiger = reports.iter().find(|r| r.employee_name == "Tiger Nixon").unwrap();
    assert_eq!(tiger.average_salary, Some(320800 / 61));
}
