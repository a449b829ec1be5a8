use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::lecture::Lecture;
use crate::view::{
  DateRange,
  Direction,
  ViewMode,
  resolve_range,
  step
};

#[derive(
  Clone,
  Debug,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct GroupSelection {
  pub id:   i64,
  pub name: String
}

#[derive(
  Clone,
  Debug,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct ViewState {
  pub view:   ViewMode,
  pub anchor: NaiveDate,
  #[serde(default)]
  pub group:  Option<GroupSelection>
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
  SetViewMode(ViewMode),
  Navigate(Direction),
  JumpToDate(NaiveDate),
  SelectGroup(Option<GroupSelection>)
}

#[derive(Clone, Debug)]
pub struct LectureBatch {
  pub range:    DateRange,
  pub group_id: Option<i64>,
  pub lectures: Vec<Lecture>
}

impl ViewState {
  #[must_use]
  pub fn initial(
    today: NaiveDate
  ) -> Self {
    Self {
      view:   ViewMode::Day,
      anchor: today,
      group:  None
    }
  }

  #[must_use]
  pub fn apply(
    &self,
    action: Action
  ) -> Self {
    let mut next = self.clone();
    match action {
      | Action::SetViewMode(view) => {
        next.view = view;
      }
      | Action::Navigate(direction) => {
        next.anchor = step(
          next.view,
          next.anchor,
          direction
        );
      }
      | Action::JumpToDate(date) => {
        next.view = ViewMode::Day;
        next.anchor = date;
      }
      | Action::SelectGroup(group) => {
        next.group = group;
      }
    }
    next
  }

  #[must_use]
  pub fn range(&self) -> DateRange {
    resolve_range(
      self.view,
      self.anchor
    )
  }

  #[must_use]
  pub fn group_id(&self) -> Option<i64>
  {
    self
      .group
      .as_ref()
      .map(|group| group.id)
  }

  #[must_use]
  pub fn accepts(
    &self,
    batch: &LectureBatch
  ) -> bool {
    batch.range == self.range()
      && batch.group_id
        == self.group_id()
  }
}
