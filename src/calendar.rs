use chrono::{Datelike, NaiveDate};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Month grid for the sidebar calendar. Weeks start on Sunday.
#[derive(Debug, Clone)]
pub struct MiniCalendar {
    pub month_name: String,
    pub year: i32,
    /// Weekday of the 1st, Sunday = 0.
    pub first_weekday: u32,
    pub days: u32,
    pub today: u32,
    pub rows: Vec<[Option<u32>; 7]>,
}

impl MiniCalendar {
    pub fn for_date(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        let first_weekday = first.weekday().num_days_from_sunday();
        let days = days_in_month(today.year(), today.month());

        let mut rows = Vec::new();
        let mut row = [None; 7];
        let mut col = first_weekday as usize;
        for day in 1..=days {
            row[col] = Some(day);
            col += 1;
            if col == 7 {
                rows.push(row);
                row = [None; 7];
                col = 0;
            }
        }
        if col > 0 {
            rows.push(row);
        }

        MiniCalendar {
            month_name: first.format("%B").to_string(),
            year: today.year(),
            first_weekday,
            days,
            today: today.day(),
            rows,
        }
    }

    pub fn render(&self) -> String {
        let mut html = format!(
            "<caption class=\"mini-caption\">{} {}</caption>\n<table class=\"mini-table\">\n<tr>",
            self.month_name, self.year
        );
        for wd in WEEKDAYS {
            html.push_str(&format!("<th>{}</th>", wd));
        }
        html.push_str("</tr>\n");

        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                match cell {
                    Some(d) if *d == self.today => html.push_str(&format!("<td class=\"today\">{}</td>", d)),
                    Some(d) => html.push_str(&format!("<td>{}</td>", d)),
                    None => html.push_str("<td></td>"),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>");
        html
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}
