use std::io::{self, IsTerminal, Write};

use chrono::{Datelike, NaiveDate};
use unicode_width::UnicodeWidthStr;

use crate::calendar::{day_name, format_date, is_today, iso_week_number, month_name};
use crate::config::Config;
use crate::lecture::{Group, User};
use crate::projection::{DayProjection, MonthProjection, Projection, WeekProjection};

const MONTH_CELL_WIDTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.ui.color && io::stdout().is_terminal(),
        }
    }

    #[tracing::instrument(skip(self, projection))]
    pub fn print_projection(
        &mut self,
        projection: &Projection<'_>,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        match projection {
            Projection::Day(day) => self.print_day(day),
            Projection::Week(week) => self.print_week(week, today),
            Projection::Month(month) => self.print_month(month),
        }
    }

    #[tracing::instrument(skip(self, projection))]
    pub fn print_day(&mut self, projection: &DayProjection<'_>) -> anyhow::Result<()> {
        self.write_day(io::stdout().lock(), projection)
    }

    #[tracing::instrument(skip(self, projection))]
    pub fn print_week(
        &mut self,
        projection: &WeekProjection<'_>,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        self.write_week(io::stdout().lock(), projection, today)
    }

    #[tracing::instrument(skip(self, projection))]
    pub fn print_month(&mut self, projection: &MonthProjection) -> anyhow::Result<()> {
        self.write_month(io::stdout().lock(), projection)
    }

    #[tracing::instrument(skip(self, groups))]
    pub fn print_groups(&mut self, groups: &[Group]) -> anyhow::Result<()> {
        self.write_groups(io::stdout().lock(), groups)
    }

    #[tracing::instrument(skip(self, user))]
    pub fn print_user(&mut self, user: &User) -> anyhow::Result<()> {
        self.write_user(io::stdout().lock(), user)
    }

    fn write_day<W: Write>(
        &self,
        mut out: W,
        projection: &DayProjection<'_>,
    ) -> anyhow::Result<()> {
        let heading = format!(
            "{}, {}",
            day_name(projection.date),
            format_date(projection.date)
        );
        writeln!(out, "{}", self.paint(&heading, "1"))?;
        writeln!(out)?;

        if projection.lectures.is_empty() {
            writeln!(out, "No lectures scheduled.")?;
            return Ok(());
        }

        let headers = vec![
            "Time".to_string(),
            "Subject".to_string(),
            "Lecturers".to_string(),
            "Rooms".to_string(),
            "Groups".to_string(),
        ];

        let mut rows = Vec::with_capacity(projection.lectures.len());
        for lecture in &projection.lectures {
            rows.push(vec![
                self.paint(&lecture.time_span(), "33"),
                lecture.subject.name.clone(),
                lecture.lecturer_names(),
                lecture.room_numbers(),
                lecture.group_names(),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    fn write_week<W: Write>(
        &self,
        mut out: W,
        projection: &WeekProjection<'_>,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let monday = projection.days[0].date;
        let sunday = projection.days[6].date;
        let heading = format!(
            "Week {}: {} - {}",
            iso_week_number(monday),
            format_date(monday),
            format_date(sunday)
        );
        writeln!(out, "{}", self.paint(&heading, "1"))?;

        for day in &projection.days {
            writeln!(out)?;
            let day_heading = format!("{}, {}", day_name(day.date), format_date(day.date));
            let day_heading = if is_today(day.date, today) {
                self.paint(&day_heading, "1;36")
            } else {
                self.paint(&day_heading, "1")
            };
            writeln!(out, "{day_heading}")?;

            if day.lectures.is_empty() {
                writeln!(out, "  no lectures")?;
                continue;
            }

            for lecture in &day.lectures {
                let mut line = format!(
                    "  {}  {}",
                    self.paint(&lecture.time_span(), "33"),
                    lecture.subject.name
                );
                let rooms = lecture.room_numbers();
                if !rooms.is_empty() {
                    line.push_str(&format!("  [{rooms}]"));
                }
                writeln!(out, "{line}")?;
            }
        }

        Ok(())
    }

    fn write_month<W: Write>(
        &self,
        mut out: W,
        projection: &MonthProjection,
    ) -> anyhow::Result<()> {
        if let Some(first) = projection.days.first() {
            let heading = format!("{} {}", month_name(first.date), first.date.year());
            writeln!(out, "{}", self.paint(&heading, "1"))?;
            writeln!(out)?;
        }

        for label in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
            write!(out, "{label:>width$} ", width = MONTH_CELL_WIDTH)?;
        }
        writeln!(out)?;

        let mut column = projection.leading_blanks as usize;
        for _ in 0..column {
            write!(out, "{:>width$} ", "", width = MONTH_CELL_WIDTH)?;
        }

        for cell in &projection.days {
            let text = if cell.lecture_count > 0 {
                format!("{} ({})", cell.date.day(), cell.lecture_count)
            } else {
                cell.date.day().to_string()
            };

            let painted = if cell.is_today {
                self.paint(&text, "1;36")
            } else if cell.lecture_count > 0 {
                self.paint(&text, "33")
            } else {
                text
            };

            let visible = UnicodeWidthStr::width(strip_ansi(&painted).as_str());
            let padding = MONTH_CELL_WIDTH.saturating_sub(visible);
            write!(out, "{}{} ", " ".repeat(padding), painted)?;

            column += 1;
            if column % 7 == 0 {
                writeln!(out)?;
            }
        }
        if column % 7 != 0 {
            writeln!(out)?;
        }

        let total: usize = projection
            .days
            .iter()
            .map(|cell| cell.lecture_count)
            .sum();
        writeln!(out)?;
        writeln!(out, "{total} lectures this month")?;
        Ok(())
    }

    fn write_groups<W: Write>(&self, mut out: W, groups: &[Group]) -> anyhow::Result<()> {
        let headers = vec!["ID".to_string(), "Name".to_string()];
        let mut rows = Vec::with_capacity(groups.len());
        for group in groups {
            rows.push(vec![self.paint(&group.id.to_string(), "33"), group.name.clone()]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    fn write_user<W: Write>(&self, mut out: W, user: &User) -> anyhow::Result<()> {
        writeln!(out, "id     {}", user.id)?;
        writeln!(out, "name   {} {}", user.first_name, user.last_name)?;
        writeln!(out, "group  {} (id {})", user.group.name, user.group.id)?;

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
