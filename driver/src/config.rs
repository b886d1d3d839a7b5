use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use error_stack::Report;
use kernel::prelude::policy::{DefaultLoanPolicy, DefaultReservationPolicy};
use kernel::KernelError;
use time::Duration;

use crate::env_opt;

static SERVER_ADDR: &str = "SERVER_ADDR";
static LOAN_PERIOD_DAYS: &str = "LOAN_PERIOD_DAYS";
static EXTENSION_DAYS: &str = "EXTENSION_DAYS";
static RESERVATION_QUEUE_SIZE: &str = "RESERVATION_QUEUE_SIZE";
static HOLD_DURATION_HOURS: &str = "HOLD_DURATION_HOURS";

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

const MAX_PERIOD_DAYS: i64 = 3650;
const MAX_QUEUE_SIZE: i64 = 1000;
const MAX_HOLD_HOURS: i64 = 87600;

fn parse_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = env_opt(key) else {
        return Ok(default);
    };
    raw.trim().parse::<T>().map_err(|error| {
        Report::new(KernelError::Validation)
            .attach_printable(format!("{key}={raw:?} is invalid: {error}"))
    })
}

fn bounded(key: &str, value: i64, max: i64) -> error_stack::Result<i64, KernelError> {
    if !(1..=max).contains(&value) {
        return Err(Report::new(KernelError::Validation)
            .attach_printable(format!("{key} must be between 1 and {max}, got {value}")));
    }
    Ok(value)
}

pub fn server_addr() -> error_stack::Result<SocketAddr, KernelError> {
    match env_opt(SERVER_ADDR) {
        Some(raw) => raw.trim().parse().map_err(|error| {
            Report::new(KernelError::Validation)
                .attach_printable(format!("{SERVER_ADDR}={raw:?} is invalid: {error}"))
        }),
        None => DEFAULT_SERVER_ADDR.parse().map_err(|error| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("default address is invalid: {error}"))
        }),
    }
}

pub fn loan_policy() -> error_stack::Result<DefaultLoanPolicy, KernelError> {
    let loan_period = bounded(
        LOAN_PERIOD_DAYS,
        parse_or(LOAN_PERIOD_DAYS, 7)?,
        MAX_PERIOD_DAYS,
    )?;
    let extension = bounded(EXTENSION_DAYS, parse_or(EXTENSION_DAYS, 7)?, MAX_PERIOD_DAYS)?;
    Ok(DefaultLoanPolicy::new(
        Duration::days(loan_period),
        Duration::days(extension),
    ))
}

pub fn reservation_policy() -> error_stack::Result<DefaultReservationPolicy, KernelError> {
    let queue_size = bounded(
        RESERVATION_QUEUE_SIZE,
        parse_or(RESERVATION_QUEUE_SIZE, 3)?,
        MAX_QUEUE_SIZE,
    )?;
    let hold_hours = bounded(
        HOLD_DURATION_HOURS,
        parse_or(HOLD_DURATION_HOURS, 72)?,
        MAX_HOLD_HOURS,
    )?;
    let queue_size = usize::try_from(queue_size).map_err(|error| {
        Report::new(KernelError::Validation)
            .attach_printable(format!("{RESERVATION_QUEUE_SIZE} is out of range: {error}"))
    })?;
    Ok(DefaultReservationPolicy::new(
        queue_size,
        Duration::hours(hold_hours),
    ))
}
