use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use teapick::analyzer::{Feedback, FeedbackTag, ScoreBand};
use teapick::session::RunReport;

fn band_color(score: u32) -> Color {
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent => Color::Green,
        ScoreBand::Good => Color::Cyan,
        ScoreBand::Fair => Color::Yellow,
        ScoreBand::NeedsWork => Color::Red,
    }
}

pub fn print_session_report(results: &[(String, RunReport)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Session").add_attribute(Attribute::Bold),
        Cell::new("Frames"),
        Cell::new("Hands"),
        Cell::new("Picks").fg(Color::Cyan),
        Cell::new("Pace/min"),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Avg"),
        Cell::new("Posture"),
        Cell::new("Level"),
        Cell::new("Badges"),
    ]);

    for i in 1..=7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, r) in results {
        let stats = r.summary.statistics;
        let posture = r
            .mean_posture_score
            .map(|p| format!("{:.0}", p))
            .unwrap_or_else(|| "-".to_string());
        let badges = if r.summary.achievements.is_empty() {
            "-".to_string()
        } else {
            r.summary
                .achievements
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(r.frames),
            Cell::new(r.detected_frames),
            Cell::new(stats.pick_count).fg(Color::Cyan),
            Cell::new(format!("{:.1}", r.summary.picks_per_minute)),
            Cell::new(stats.current_score)
                .fg(band_color(stats.current_score))
                .add_attribute(Attribute::Bold),
            Cell::new(stats.average_score).fg(band_color(stats.average_score)),
            Cell::new(posture),
            Cell::new(r.summary.level),
            Cell::new(badges),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_feedback(name: &str, feedback: &[Feedback]) {
    if feedback.is_empty() {
        println!("\n{}: no hand detected", name);
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![Cell::new(format!("Feedback ({})", name)).add_attribute(Attribute::Bold)]);

    for f in feedback {
        let color = match f.tag() {
            FeedbackTag::Good => Color::Green,
            FeedbackTag::Caution => Color::Yellow,
            FeedbackTag::Problem => Color::Red,
            FeedbackTag::Waiting => Color::Grey,
        };
        table.add_row(vec![Cell::new(f).fg(color)]);
    }
    println!("{}", table);
}
