use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;
use tokio::task::JoinHandle;

use crate::config::{DEFAULT_LAUNCH_DAY, DEFAULT_TIMEZONE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
}

impl CountdownTime {
    pub fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
        }
    }

    /// remaining time from `now` to `target`, counting whole calendar days in the
    /// target's timezone first and splitting the rest into hours/minutes/seconds
    pub fn between(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Self {
        if target <= now {
            return Self::expired();
        }

        let now = now.with_timezone(&target.timezone());
        let mut days = (target.date_naive() - now.date_naive()).num_days().max(0);
        let mut anchor = shift_days(&now, days);
        while days > 0 && anchor > *target {
            days -= 1;
            anchor = shift_days(&now, days);
        }

        let rest = *target - anchor;
        Self {
            days,
            hours: rest.num_hours(),
            minutes: rest.num_minutes() % 60,
            seconds: rest.num_seconds() % 60,
            is_expired: false,
        }
    }
}

/// moves a local wall-clock time by whole days, keeping the time of day when it exists
fn shift_days(from: &DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let naive = from.naive_local() + Duration::days(days);
    match from.timezone().from_local_datetime(&naive) {
        LocalResult::Single(shifted) => shifted,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // inside a DST gap
        LocalResult::None => *from + Duration::days(days),
    }
}

/// two-digit zero padded countdown cell
pub fn format_value(value: i64) -> String {
    format!("{:02}", value)
}

/// when the launch happens: a fixed override, or a day of month at local midnight
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSchedule {
    pub timezone: Tz,
    pub day_of_month: u32,
    pub override_at: Option<NaiveDateTime>,
}

impl Default for LaunchSchedule {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            day_of_month: DEFAULT_LAUNCH_DAY,
            override_at: None,
        }
    }
}

impl LaunchSchedule {
    pub fn fixed(timezone: Tz, at: NaiveDateTime) -> Self {
        Self {
            timezone,
            day_of_month: DEFAULT_LAUNCH_DAY,
            override_at: Some(at),
        }
    }

    /// target instant as seen from `now`
    pub fn target_at(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        if let Some(at) = self.override_at {
            return self.local_instant(at);
        }

        let local_now = now.with_timezone(&self.timezone);
        let this_month = self.launch_in_month(local_now.year(), local_now.month());
        if local_now >= this_month {
            let (year, month) = if local_now.month() == 12 {
                (local_now.year() + 1, 1)
            } else {
                (local_now.year(), local_now.month() + 1)
            };
            self.launch_in_month(year, month)
        } else {
            this_month
        }
    }

    pub fn countdown_at(&self, now: DateTime<Utc>) -> CountdownTime {
        let target = self.target_at(now);
        CountdownTime::between(&target, &now.with_timezone(&self.timezone))
    }

    fn launch_in_month(&self, year: i32, month: u32) -> DateTime<Tz> {
        let midnight = NaiveDate::from_ymd_opt(year, month, self.day_of_month)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        self.local_instant(midnight)
    }

    fn local_instant(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(at) => at,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self.timezone.from_utc_datetime(&naive),
        }
    }
}

/// recomputes the countdown every second until dropped
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F>(schedule: LaunchSchedule, on_tick: F) -> Self
    where
        F: FnMut(CountdownTime) + Send + 'static,
    {
        Self::spawn_with_clock(schedule, Utc::now, on_tick)
    }

    pub fn spawn_with_clock<C, F>(schedule: LaunchSchedule, clock: C, mut on_tick: F) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
        F: FnMut(CountdownTime) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));
            loop {
                interval.tick().await;
                on_tick(schedule.countdown_at(clock()));
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        // drop aborts
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        debug!("Stopping countdown ticker");
        self.handle.abort();
    }
}
