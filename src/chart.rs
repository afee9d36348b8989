//! Chart renderer: task list in, chart description out.
//!
//! Rendering is a pure function. Pixels are the client's business; this
//! module only decides bar placement, grouping, colors, and labels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Task, default_seed_tasks};

/// Fixed chart title.
pub const CHART_TITLE: &str = "Project Gantt Chart";

/// X-axis title.
pub const X_AXIS_TITLE: &str = "Timeline";

/// Fixed vertical extent in pixels.
pub const CHART_HEIGHT: u32 = 500;

/// Resource colors, reused round-robin when there are more resources.
pub const PALETTE: [&str; 6] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DFE6E9",
];

/// Pointer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    /// Hover shows the nearest point.
    Closest,
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    /// `"{name} ({completion}%)"`.
    pub label: String,
    /// Row index into [`ChartDescription::rows`].
    pub row: usize,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub resource: String,
    pub color: String,
    pub completion: i32,
}

/// Legend entry: one per resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub resource: String,
    pub color: String,
}

/// Inclusive date span covered by the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

/// Everything a client needs to draw the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub title: String,
    pub x_axis_title: String,
    pub height: u32,
    pub hover_mode: HoverMode,
    pub show_legend: bool,
    pub time_range: Option<TimeRange>,
    /// Row labels, top to bottom. Bars with identical labels share a row.
    pub rows: Vec<String>,
    pub bars: Vec<ChartBar>,
    pub legend: Vec<LegendEntry>,
}

/// Display label for a task.
pub fn task_label(task: &Task) -> String {
    format!("{} ({}%)", task.name, task.completion)
}

/// Recover the completion value from a label built by [`task_label`].
pub fn parse_completion_label(label: &str) -> Option<i32> {
    let (_, tail) = label.rsplit_once(" (")?;
    tail.strip_suffix("%)")?.parse().ok()
}

/// Render a task list. An empty list renders the default seed schedule.
pub fn render(tasks: &[Task]) -> ChartDescription {
    let seed;
    let tasks = if tasks.is_empty() {
        seed = default_seed_tasks();
        seed.as_slice()
    } else {
        tasks
    };

    let mut rows: Vec<String> = Vec::new();
    let mut legend: Vec<LegendEntry> = Vec::new();
    let mut bars = Vec::with_capacity(tasks.len());

    for task in tasks {
        let label = task_label(task);
        let row = match rows.iter().position(|r| *r == label) {
            Some(idx) => idx,
            None => {
                rows.push(label.clone());
                rows.len() - 1
            }
        };

        let color = match legend.iter().find(|e| e.resource == task.resource) {
            Some(entry) => entry.color.clone(),
            None => {
                let color = PALETTE[legend.len() % PALETTE.len()].to_owned();
                legend.push(LegendEntry {
                    resource: task.resource.clone(),
                    color: color.clone(),
                });
                color
            }
        };

        bars.push(ChartBar {
            label,
            row,
            start: task.start,
            finish: task.finish,
            resource: task.resource.clone(),
            color,
            completion: task.completion,
        });
    }

    let time_range = bars
        .iter()
        .flat_map(|b| [b.start, b.finish])
        .fold(None, |range: Option<TimeRange>, date| {
            Some(match range {
                None => TimeRange {
                    start: date,
                    finish: date,
                },
                Some(r) => TimeRange {
                    start: r.start.min(date),
                    finish: r.finish.max(date),
                },
            })
        });

    ChartDescription {
        title: CHART_TITLE.to_owned(),
        x_axis_title: X_AXIS_TITLE.to_owned(),
        height: CHART_HEIGHT,
        hover_mode: HoverMode::Closest,
        show_legend: true,
        time_range,
        rows,
        bars,
        legend,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn empty_input_renders_seed() {
        assert_eq!(render(&[]), render(&default_seed_tasks()));
    }

    #[test]
    fn labels_round_trip_completion() {
        let tasks = vec![
            Task::new("Plain", date(1, 1), date(1, 2)).with_completion(0),
            Task::new("Odd (draft)", date(1, 1), date(1, 2)).with_completion(55),
            Task::new("Over", date(1, 1), date(1, 2)).with_completion(250),
            Task::new("Under", date(1, 1), date(1, 2)).with_completion(-5),
        ];
        let chart = render(&tasks);
        let recovered: Vec<i32> = chart
            .bars
            .iter()
            .map(|b| parse_completion_label(&b.label).unwrap())
            .collect();
        assert_eq!(recovered, vec![0, 55, 250, -5]);
    }

    #[test]
    fn seed_chart_layout() {
        let chart = render(&default_seed_tasks());
        assert_eq!(chart.title, CHART_TITLE);
        assert_eq!(chart.x_axis_title, "Timeline");
        assert_eq!(chart.height, 500);
        assert_eq!(chart.hover_mode, HoverMode::Closest);
        assert!(chart.show_legend);
        assert_eq!(chart.bars.len(), 6);
        assert_eq!(chart.bars[0].label, "Project Planning (100%)");
        assert_eq!(
            chart.time_range,
            Some(TimeRange {
                start: date(11, 1),
                finish: date(12, 5),
            })
        );

        // Dev Team appears twice but gets one legend entry and one color.
        let resources: Vec<&str> = chart.legend.iter().map(|e| e.resource.as_str()).collect();
        assert_eq!(
            resources,
            vec![
                "Project Manager",
                "Business Analyst",
                "Design Team",
                "Dev Team",
                "QA Team"
            ]
        );
        assert_eq!(chart.bars[3].color, chart.bars[4].color);
        assert_eq!(chart.bars[3].color, PALETTE[3]);
        assert_eq!(chart.bars[5].color, PALETTE[4]);
    }

    #[test]
    fn palette_cycles_after_six_resources() {
        let tasks: Vec<Task> = (0..8)
            .map(|i| Task::new(format!("T{i}"), date(1, 1), date(1, 2)).with_resource(format!("R{i}")))
            .collect();
        let chart = render(&tasks);
        assert_eq!(chart.legend.len(), 8);
        assert_eq!(chart.legend[6].color, PALETTE[0]);
        assert_eq!(chart.legend[7].color, PALETTE[1]);
    }

    #[test]
    fn identical_labels_share_a_row() {
        let tasks = vec![
            Task::new("Review", date(1, 1), date(1, 2)),
            Task::new("Build", date(1, 3), date(1, 4)),
            Task::new("Review", date(1, 5), date(1, 6)),
        ];
        let chart = render(&tasks);
        assert_eq!(chart.rows, vec!["Review (0%)", "Build (0%)"]);
        assert_eq!(
            chart.bars.iter().map(|b| b.row).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
    }

    #[test]
    fn render_is_deterministic_and_non_mutating() {
        let tasks = default_seed_tasks();
        let before = tasks.clone();
        assert_eq!(render(&tasks), render(&tasks));
        assert_eq!(tasks, before);
    }

    #[test]
    fn parse_rejects_foreign_labels() {
        assert_eq!(parse_completion_label("No percent"), None);
        assert_eq!(parse_completion_label("Bad (x%)"), None);
        assert_eq!(parse_completion_label("Missing (50)"), None);
    }
}
