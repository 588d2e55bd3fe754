//! Fixed-size worker pool over a shared job channel.
//!
//! Workers pull from one `mpsc` receiver guarded by an async mutex, so each
//! employee is handled by exactly one worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::models::Employee;

pub const DEFAULT_WORKERS: usize = 9;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub workers: usize,
    /// Simulated processing time per job
    pub delay: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            delay: DEFAULT_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReport {
    pub worker_id: usize,
    pub employee_id: String,
    pub employee_name: String,
    pub average_salary: Option<i64>,
}

/// Distribute `employees` over `config.workers` workers and collect one report per employee.
///
/// Report order follows completion, not input order.
pub async fn run_pool(employees: Vec<Employee>, config: &PoolConfig) -> Vec<EmployeeReport> {
    let workers = config.workers.max(1);
    let total = employees.len();
    let (tx, rx) = mpsc::channel::<Employee>(total.max(1));
    let rx = Arc::new(Mutex::new(rx));

    let mut tasks = JoinSet::new();
    for worker_id in 1..=workers {
        let rx = Arc::clone(&rx);
        let delay = config.delay;
        tasks.spawn(async move { worker(worker_id, rx, delay).await });
    }

    for employee in employees {
        if tx.send(employee).await.is_err() {
            warn!("all workers exited before the queue drained");
            break;
        }
    }
    drop(tx);

    let mut reports = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(mut done) => reports.append(&mut done),
            Err(e) => warn!(error = %e, "worker task failed"),
        }
    }

    info!(workers, processed = reports.len(), "worker pool finished");
    reports
}

async fn worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Employee>>>,
    delay: Duration,
) -> Vec<EmployeeReport> {
    let mut done = Vec::new();
    loop {
        // Lock is released before the simulated work starts.
        let job = rx.lock().await.recv().await;
        let Some(employee) = job else { break };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let average_salary = employee.average_salary();
        match average_salary {
            Some(avg) => info!(
                worker_id,
                employee_id = %employee.id,
                name = %employee.employee_name,
                salary = employee.employee_salary,
                age = employee.employee_age,
                average = avg,
                "processed employee"
            ),
            None => warn!(
                worker_id,
                employee_id = %employee.id,
                name = %employee.employee_name,
                age = employee.employee_age,
                "employee age is not positive, skipping average"
            ),
        }

        done.push(EmployeeReport {
            worker_id,
            employee_id: employee.id,
            employee_name: employee.employee_name,
            average_salary,
        });
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u32, salary: i64, age: i64) -> Employee {
        Employee {
            id: id.to_string(),
            employee_name: format!("Employee {}", id),
            employee_salary: salary,
            employee_age: age,
            profile_image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_input_yields_no_reports() {
        let config = PoolConfig {
            workers: 3,
            delay: Duration::ZERO,
        };
        assert!(run_pool(Vec::new(), &config).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_is_clamped_to_one() {
        let config = PoolConfig {
            workers: 0,
            delay: Duration::ZERO,
        };
        let reports = run_pool(vec![employee(1, 100, 10)], &config).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].worker_id, 1);
        assert_eq!(reports[0].average_salary, Some(10));
    }
}
