use std::collections::HashMap;

/// Return the indices of two distinct elements of `nums` that add up to `target`.
///
/// Single pass with a value -> index map. The earlier index comes first.
/// `None` when no such pair exists.
pub fn two_sum(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(nums.len());

    for (i, &num) in nums.iter().enumerate() {
        if let Some(&j) = target.checked_sub(num).and_then(|c| seen.get(&c)) {
            return Some((j, i));
        }
        seen.insert(num, i);
    }

    None
}
