//! services/schedule_resolver.rs
//! Convierte la hora del formulario (12h) a la hora 24h que espera el sender.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::errors::ValidationError;
use crate::models::dispatch_model::{Meridiem, ScheduleInput, SendTime};

/// Margen que se le da al sender en un envío inmediato
const IMMEDIATE_LEAD_MINUTES: i64 = 1;

/// Pura dado `now`. Un envío inmediato ignora hour/minute/am_pm y apunta
/// a un minuto después de `now`, pasando a la hora siguiente si hace falta.
pub fn resolve(input: &ScheduleInput, now: NaiveDateTime) -> SendTime {
    if input.send_immediately {
        let target = now + Duration::minutes(IMMEDIATE_LEAD_MINUTES);
        return SendTime::new(target.hour(), target.minute());
    }

    let hour = u32::from(input.hour);
    let hour = match input.am_pm {
        Meridiem::PM if hour != 12 => hour + 12,
        Meridiem::AM if hour == 12 => 0,
        _ => hour,
    };

    SendTime::new(hour, u32::from(input.minute))
}

pub fn validate(input: &ScheduleInput) -> Result<(), ValidationError> {
    if input.send_immediately {
        return Ok(());
    }
    if !(1..=12).contains(&input.hour) || input.minute > 59 {
        return Err(ValidationError::InvalidScheduleTime {
            hour: input.hour,
            minute: input.minute,
        });
    }
    Ok(())
}
