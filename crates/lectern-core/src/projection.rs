use chrono::{
  Datelike,
  NaiveDate
};

use crate::calendar::{
  is_today,
  month_dates,
  week_dates
};
use crate::lecture::Lecture;
use crate::view::ViewMode;

#[derive(Debug, Clone)]
pub struct DayProjection<'a> {
  pub date:     NaiveDate,
  pub lectures: Vec<&'a Lecture>
}

#[derive(Debug, Clone)]
pub struct WeekProjection<'a> {
  pub days: [DayProjection<'a>; 7]
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct MonthDayCell {
  pub date:          NaiveDate,
  pub lecture_count: usize,
  pub is_today:      bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthProjection {
  pub leading_blanks: u32,
  pub days:           Vec<MonthDayCell>
}

#[derive(Debug, Clone)]
pub enum Projection<'a> {
  Day(DayProjection<'a>),
  Week(WeekProjection<'a>),
  Month(MonthProjection)
}

#[must_use]
pub fn project_day(
  lectures: &[Lecture],
  anchor: NaiveDate
) -> DayProjection<'_> {
  let mut entries = lectures
    .iter()
    .filter(|lecture| {
      lecture.date == anchor
    })
    .collect::<Vec<_>>();

  entries.sort_by(|a, b| {
    a.start_time.cmp(&b.start_time)
  });

  DayProjection {
    date:     anchor,
    lectures: entries
  }
}

#[must_use]
pub fn project_week(
  lectures: &[Lecture],
  anchor: NaiveDate
) -> WeekProjection<'_> {
  let week = week_dates(anchor);
  WeekProjection {
    days: std::array::from_fn(|idx| {
      project_day(lectures, week[idx])
    })
  }
}

#[must_use]
pub fn project_month(
  lectures: &[Lecture],
  anchor: NaiveDate,
  today: NaiveDate
) -> MonthProjection {
  let dates = month_dates(anchor);
  let leading_blanks = dates
    .first()
    .map(|first| {
      first
        .weekday()
        .num_days_from_sunday()
    })
    .unwrap_or(0);

  let days = dates
    .into_iter()
    .map(|date| {
      let lecture_count = lectures
        .iter()
        .filter(|lecture| {
          lecture.date == date
        })
        .count();
      MonthDayCell {
        date,
        lecture_count,
        is_today: is_today(date, today)
      }
    })
    .collect();

  MonthProjection {
    leading_blanks,
    days
  }
}

#[must_use]
pub fn project<'a>(
  view: ViewMode,
  lectures: &'a [Lecture],
  anchor: NaiveDate,
  today: NaiveDate
) -> Projection<'a> {
  tracing::debug!(
    view = view.as_key(),
    anchor = %anchor,
    total = lectures.len(),
    "projecting lectures"
  );

  match view {
    | ViewMode::Day => Projection::Day(
      project_day(lectures, anchor)
    ),
    | ViewMode::Week => {
      Projection::Week(project_week(
        lectures, anchor
      ))
    }
    | ViewMode::Month => {
      Projection::Month(project_month(
        lectures, anchor, today
      ))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lecture::Subject;

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

  fn lecture(
    id: i64,
    date: NaiveDate,
    start: &str,
    end: &str
  ) -> Lecture {
    Lecture {
      id,
      date,
      period: "1".to_string(),
      start_time: start.to_string(),
      end_time: end.to_string(),
      subject: Subject {
        id,
        name: format!("Subject {id}"),
        external_id: String::new()
      },
      lecturers: vec![],
      rooms: vec![],
      groups: vec![],
      colors: vec![]
    }
  }

  #[test]
  fn day_filters_and_sorts_by_start_time()
  {
    let anchor = date(2026, 2, 8);
    let lectures = vec![
      lecture(
        1,
        anchor,
        "10:00",
        "11:30"
      ),
      lecture(
        2,
        anchor,
        "08:00",
        "09:30"
      ),
      lecture(
        3,
        date(2026, 2, 9),
        "09:00",
        "10:30"
      ),
    ];

    let projection =
      project_day(&lectures, anchor);

    assert_eq!(
      projection.lectures.len(),
      2
    );
    assert_eq!(
      projection.lectures[0].id,
      2
    );
    assert_eq!(
      projection.lectures[1].id,
      1
    );
  }

  #[test]
  fn equal_start_times_keep_input_order()
  {
    let anchor = date(2026, 2, 8);
    let lectures = vec![
      lecture(
        10,
        anchor,
        "08:00",
        "09:30"
      ),
      lecture(
        11,
        anchor,
        "08:00",
        "09:30"
      ),
      lecture(
        12,
        anchor,
        "08:00",
        "09:30"
      ),
    ];

    let projection =
      project_day(&lectures, anchor);
    let ids = projection
      .lectures
      .iter()
      .map(|entry| entry.id)
      .collect::<Vec<_>>();
    assert_eq!(ids, vec![10, 11, 12]);
  }

  #[test]
  fn week_buckets_run_monday_to_sunday()
  {
    let sunday = date(2026, 2, 8);
    let lectures = vec![
      lecture(
        1,
        date(2026, 2, 2),
        "08:00",
        "09:30"
      ),
      lecture(
        2,
        sunday,
        "10:00",
        "11:30"
      ),
      lecture(
        3,
        date(2026, 2, 9),
        "08:00",
        "09:30"
      ),
    ];

    let projection =
      project_week(&lectures, sunday);

    assert_eq!(
      projection.days[0].date,
      date(2026, 2, 2)
    );
    assert_eq!(
      projection.days[6].date,
      sunday
    );
    assert_eq!(
      projection.days[0].lectures.len(),
      1
    );
    assert_eq!(
      projection.days[6].lectures.len(),
      1
    );
    for idx in 1..6 {
      assert!(
        projection.days[idx]
          .lectures
          .is_empty()
      );
    }
  }

  #[test]
  fn empty_month_yields_zero_counts() {
    let today = date(2026, 2, 8);
    let projection = project_month(
      &[],
      date(2026, 2, 8),
      today
    );

    assert_eq!(
      projection.days.len(),
      28
    );
    assert!(
      projection
        .days
        .iter()
        .all(|cell| cell.lecture_count
          == 0)
    );
    assert!(
      projection.days[7].is_today
    );
    assert_eq!(
      projection
        .days
        .iter()
        .filter(|cell| cell.is_today)
        .count(),
      1
    );
  }

  #[test]
  fn leading_blanks_follow_sunday_first_grid(
  ) {
    let today = date(2026, 6, 1);

    let february = project_month(
      &[],
      date(2026, 2, 10),
      today
    );
    assert_eq!(
      february.leading_blanks,
      0
    );

    let january = project_month(
      &[],
      date(2026, 1, 10),
      today
    );
    assert_eq!(
      january.leading_blanks,
      4
    );

    let april = project_month(
      &[],
      date(2026, 4, 10),
      today
    );
    assert_eq!(april.leading_blanks, 3);
  }

  #[test]
  fn month_counts_lectures_per_day() {
    let anchor = date(2026, 2, 8);
    let lectures = vec![
      lecture(
        1,
        date(2026, 2, 2),
        "08:00",
        "09:30"
      ),
      lecture(
        2,
        date(2026, 2, 2),
        "10:00",
        "11:30"
      ),
      lecture(
        3,
        date(2026, 2, 28),
        "08:00",
        "09:30"
      ),
      lecture(
        4,
        date(2026, 3, 1),
        "08:00",
        "09:30"
      ),
    ];

    let projection = project_month(
      &lectures,
      anchor,
      date(2026, 2, 8)
    );

    assert_eq!(
      projection.days[1].lecture_count,
      2
    );
    assert_eq!(
      projection.days[27].lecture_count,
      1
    );
    let total: usize = projection
      .days
      .iter()
      .map(|cell| cell.lecture_count)
      .sum();
    assert_eq!(total, 3);
  }

  #[test]
  fn dispatcher_matches_view_mode() {
    let anchor = date(2026, 2, 8);
    let today = date(2026, 2, 8);
    let lectures = vec![lecture(
      1,
      anchor,
      "08:00",
      "09:30"
    )];

    match project(
      ViewMode::Day,
      &lectures,
      anchor,
      today
    ) {
      | Projection::Day(day) => {
        assert_eq!(
          day.lectures.len(),
          1
        );
      }
      | other => {
        panic!(
          "expected day projection, \
           got {other:?}"
        )
      }
    }

    match project(
      ViewMode::Month,
      &lectures,
      anchor,
      today
    ) {
      | Projection::Month(month) => {
        assert_eq!(
          month.days.len(),
          28
        );
      }
      | other => {
        panic!(
          "expected month projection, \
           got {other:?}"
        )
      }
    }
  }
}
