use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer
};

use crate::calendar::{
  add_days,
  first_day_of_month,
  last_day_of_month,
  shift_months,
  week_dates
};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq,
)]
pub enum ViewMode {
  Day,
  Week,
  Month
}

impl ViewMode {
  #[must_use]
  pub fn all() -> [Self; 3] {
    [Self::Day, Self::Week, Self::Month]
  }

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::Month => "month"
    }
  }

  #[must_use]
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "day" => Some(Self::Day),
      | "week" => Some(Self::Week),
      | "month" => Some(Self::Month),
      | _ => None
    }
  }
}

impl Serialize for ViewMode {
  fn serialize<S>(
    &self,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer
      .serialize_str(self.as_key())
  }
}

impl<'de> Deserialize<'de>
  for ViewMode
{
  fn deserialize<D>(
    deserializer: D
  ) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw =
      String::deserialize(deserializer)?;
    Self::from_key(&raw).ok_or_else(
      || {
        let valid = Self::all()
          .map(Self::as_key)
          .join(", ");
        serde::de::Error::custom(
          format!(
            "unknown view mode `{raw}` \
             (expected one of: {valid})"
          )
        )
      }
    )
  }
}

#[derive(
  Clone, Copy, Debug, PartialEq, Eq,
)]
pub enum Direction {
  Previous,
  Next
}

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct DateRange {
  pub from: NaiveDate,
  pub to:   NaiveDate
}

impl DateRange {
  #[must_use]
  pub fn contains(
    self,
    date: NaiveDate
  ) -> bool {
    date >= self.from && date <= self.to
  }

  #[must_use]
  pub fn len_days(self) -> i64 {
    (self.to - self.from).num_days() + 1
  }
}

#[must_use]
pub fn resolve_range(
  view: ViewMode,
  anchor: NaiveDate
) -> DateRange {
  match view {
    | ViewMode::Day => DateRange {
      from: anchor,
      to:   anchor
    },
    | ViewMode::Week => {
      let week = week_dates(anchor);
      DateRange {
        from: week[0],
        to:   week[6]
      }
    }
    | ViewMode::Month => DateRange {
      from: first_day_of_month(
        anchor.year(),
        anchor.month()
      ),
      to:   last_day_of_month(
        anchor.year(),
        anchor.month()
      )
    }
  }
}

#[must_use]
pub fn step(
  view: ViewMode,
  anchor: NaiveDate,
  direction: Direction
) -> NaiveDate {
  let unit = match direction {
    | Direction::Previous => -1_i64,
    | Direction::Next => 1_i64
  };

  match view {
    | ViewMode::Day => {
      add_days(anchor, unit)
    }
    | ViewMode::Week => {
      add_days(anchor, unit * 7)
    }
    | ViewMode::Month => {
      shift_months(anchor, unit as i32)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Weekday;

  use super::*;

  fn date(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  #[test]
  fn day_range_is_degenerate() {
    let anchor = date(2026, 2, 8);
    let range = resolve_range(
      ViewMode::Day,
      anchor
    );
    assert_eq!(range.from, anchor);
    assert_eq!(range.to, anchor);
    assert_eq!(range.len_days(), 1);
  }

  #[test]
  fn week_range_runs_monday_to_sunday()
  {
    let sunday = date(2026, 2, 8);
    let range = resolve_range(
      ViewMode::Week,
      sunday
    );
    assert_eq!(
      range.from,
      date(2026, 2, 2)
    );
    assert_eq!(range.to, sunday);
    assert_eq!(
      range.from.weekday(),
      Weekday::Mon
    );
    assert_eq!(range.len_days(), 7);

    let week = week_dates(sunday);
    assert_eq!(range.from, week[0]);
    assert_eq!(range.to, week[6]);
  }

  #[test]
  fn month_range_spans_whole_month() {
    let range = resolve_range(
      ViewMode::Month,
      date(2026, 2, 8)
    );
    assert_eq!(
      range.from,
      date(2026, 2, 1)
    );
    assert_eq!(
      range.to,
      date(2026, 2, 28)
    );

    let leap = resolve_range(
      ViewMode::Month,
      date(2024, 2, 15)
    );
    assert_eq!(
      leap.to,
      date(2024, 2, 29)
    );
  }

  #[test]
  fn range_contains_is_inclusive() {
    let range = resolve_range(
      ViewMode::Week,
      date(2026, 2, 8)
    );
    assert!(
      range.contains(date(2026, 2, 2))
    );
    assert!(
      range.contains(date(2026, 2, 8))
    );
    assert!(
      !range.contains(date(2026, 2, 1))
    );
    assert!(
      !range.contains(date(2026, 2, 9))
    );
  }

  #[test]
  fn day_and_week_steps_round_trip() {
    let anchor = date(2026, 2, 8);
    for view in
      [ViewMode::Day, ViewMode::Week]
    {
      let forward = step(
        view,
        anchor,
        Direction::Next
      );
      let back = step(
        view,
        forward,
        Direction::Previous
      );
      assert_eq!(back, anchor);
    }

    assert_eq!(
      step(
        ViewMode::Day,
        anchor,
        Direction::Next
      ),
      date(2026, 2, 9)
    );
    assert_eq!(
      step(
        ViewMode::Week,
        anchor,
        Direction::Next
      ),
      date(2026, 2, 15)
    );
  }

  #[test]
  fn month_step_clamps_long_days() {
    assert_eq!(
      step(
        ViewMode::Month,
        date(2026, 1, 31),
        Direction::Next
      ),
      date(2026, 2, 28)
    );
    assert_eq!(
      step(
        ViewMode::Month,
        date(2026, 2, 15),
        Direction::Previous
      ),
      date(2026, 1, 15)
    );
  }

  #[test]
  fn view_keys_round_trip() {
    for view in ViewMode::all() {
      assert_eq!(
        ViewMode::from_key(
          view.as_key()
        ),
        Some(view)
      );
    }
    assert_eq!(
      ViewMode::from_key("fortnight"),
      None
    );
  }

  #[test]
  fn serde_rejects_unknown_view_keys()
  {
    let parsed: ViewMode =
      serde_json::from_str("\"week\"")
        .expect("valid key");
    assert_eq!(parsed, ViewMode::Week);

    let err = serde_json::from_str::<
      ViewMode
    >("\"list\"")
    .expect_err("unknown key");
    assert!(
      err
        .to_string()
        .contains("unknown view mode")
    );
  }
}
