use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Datelike,
  Duration,
  Local,
  NaiveDate,
  Weekday
};
use regex::Regex;

#[must_use]
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

#[must_use]
pub fn format_date(
  date: NaiveDate
) -> String {
  date.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn is_same_day(
  a: NaiveDate,
  b: NaiveDate
) -> bool {
  a.year() == b.year()
    && a.month() == b.month()
    && a.day() == b.day()
}

#[must_use]
pub fn is_today(
  date: NaiveDate,
  today: NaiveDate
) -> bool {
  is_same_day(date, today)
}

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn start_of_week(
  date: NaiveDate
) -> NaiveDate {
  let offset = date
    .weekday()
    .num_days_from_monday()
    as i64;
  add_days(date, -offset)
}

#[must_use]
pub fn week_dates(
  date: NaiveDate
) -> [NaiveDate; 7] {
  let monday = start_of_week(date);
  std::array::from_fn(|idx| {
    add_days(monday, idx as i64)
  })
}

#[must_use]
pub fn month_dates(
  date: NaiveDate
) -> Vec<NaiveDate> {
  let first = first_day_of_month(
    date.year(),
    date.month()
  );
  let count = i64::from(days_in_month(
    date.year(),
    date.month()
  ));
  (0..count)
    .map(|offset| {
      add_days(first, offset)
    })
    .collect()
}

#[must_use]
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[must_use]
pub fn iso_week_number(
  date: NaiveDate
) -> u32 {
  date.iso_week().week()
}

#[must_use]
pub fn day_name(
  date: NaiveDate
) -> &'static str {
  match date.weekday() {
    | Weekday::Mon => "Monday",
    | Weekday::Tue => "Tuesday",
    | Weekday::Wed => "Wednesday",
    | Weekday::Thu => "Thursday",
    | Weekday::Fri => "Friday",
    | Weekday::Sat => "Saturday",
    | Weekday::Sun => "Sunday"
  }
}

#[must_use]
pub fn month_name(
  date: NaiveDate
) -> &'static str {
  match date.month() {
    | 1 => "January",
    | 2 => "February",
    | 3 => "March",
    | 4 => "April",
    | 5 => "May",
    | 6 => "June",
    | 7 => "July",
    | 8 => "August",
    | 9 => "September",
    | 10 => "October",
    | 11 => "November",
    | _ => "December"
  }
}

#[tracing::instrument(skip(today))]
pub fn parse_date_arg(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();
  let lower =
    token.to_ascii_lowercase();

  match lower.as_str() {
    | "today" => return Ok(today),
    | "tomorrow" => {
      return Ok(add_days(today, 1));
    }
    | "yesterday" => {
      return Ok(add_days(today, -1));
    }
    | _ => {}
  }

  if let Some(target) =
    parse_weekday_name(&lower)
  {
    return Ok(next_weekday_date(
      today, target
    ));
  }

  let rel_re = Regex::new(
    r"^(?P<sign>[+-])(?P<num>\d+)d$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;

  if let Some(caps) =
    rel_re.captures(token)
  {
    let sign = caps
      .name("sign")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing offset sign")
      })?;
    let num: i64 = caps
      .name("num")
      .map(|m| m.as_str())
      .ok_or_else(|| {
        anyhow!("missing offset amount")
      })?
      .parse()
      .context(
        "invalid offset number"
      )?;
    let days = if sign == "-" {
      -num
    } else {
      num
    };
    return Ok(add_days(today, days));
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token, "%Y-%m-%d"
    )
  {
    return Ok(date);
  }

  Err(anyhow!(
    "supported forms: \
     today/tomorrow/yesterday, \
     weekday names (e.g. monday), \
     +Nd/-Nd day offsets, YYYY-MM-DD"
  ))
  .with_context(|| {
    format!("unrecognized date: {input}")
  })
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token.trim() {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

fn next_weekday_date(
  from: NaiveDate,
  target: Weekday
) -> NaiveDate {
  let from_idx = from
    .weekday()
    .num_days_from_monday()
    as i64;
  let target_idx = target
    .num_days_from_monday()
    as i64;
  let mut delta =
    (7 + target_idx - from_idx) % 7;
  if delta == 0 {
    delta = 7;
  }
  add_days(from, delta)
}
