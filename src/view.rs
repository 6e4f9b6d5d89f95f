//! Text rendering of form state and prediction records.
//!
//! Everything here is a pure function of its input.

use std::fmt::Write;

use crate::controller::{Controller, History, Tab};
use crate::models::{Field, Measurements, PredictionRecord};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

pub const FALLBACK_STYLE: SpeciesStyle = SpeciesStyle {
    color: "#6B7280",
    icon: "🌿",
};

/// Color and glyph for a class name. Unknown classes get [`FALLBACK_STYLE`].
pub fn species_style(species: &str) -> SpeciesStyle {
    match species {
        "setosa" => SpeciesStyle {
            color: "#10B981",
            icon: "🌸",
        },
        "versicolor" => SpeciesStyle {
            color: "#3B82F6",
            icon: "🌺",
        },
        "virginica" => SpeciesStyle {
            color: "#8B5CF6",
            icon: "🌷",
        },
        _ => FALLBACK_STYLE,
    }
}

/// `0.9` -> `"90.0%"`.
pub fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn bar(p: f64) -> String {
    let filled = if p.is_finite() {
        ((p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn render_form(form: &Measurements) -> String {
    let flagged = form.out_of_range();
    let mut out = String::new();
    for field in Field::ALL {
        let value = form.get(field);
        let hint = if flagged.contains(&field) {
            "  (outside 0-10)"
        } else {
            ""
        };
        let _ = writeln!(out, "  {:<18} {:>6} cm{}", field.label(), value, hint);
    }
    out
}

pub fn render_record(record: &PredictionRecord) -> String {
    let style = species_style(record.species());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}  confidence {}  [{}]",
        style.icon,
        record.species(),
        percent(record.confidence),
        style.color
    );
    let _ = writeln!(out, "  {}", bar(record.confidence));
    let _ = writeln!(out, "  Probability breakdown:");
    for (class, p) in record.response.ranked() {
        let _ = writeln!(
            out,
            "    {} {:<12} {} {:>6}",
            species_style(class).icon,
            class,
            bar(p),
            percent(p)
        );
    }
    let _ = writeln!(out, "  Analysis completed at {}", record.timestamp);
    out
}

pub fn render_history(history: &History) -> String {
    if history.is_empty() {
        return "No predictions yet.\n".to_string();
    }
    let mut out = String::new();
    for (i, record) in history.iter().enumerate() {
        let style = species_style(record.species());
        let _ = writeln!(
            out,
            "{:>2}. {}  {} {:<12} {:>6}",
            i + 1,
            record.timestamp,
            style.icon,
            record.species(),
            percent(record.confidence)
        );
        let breakdown: Vec<String> = record
            .proba()
            .iter()
            .map(|(class, p)| format!("{} {}", class, percent(*p)))
            .collect();
        let _ = writeln!(out, "      {}", breakdown.join(", "));
    }
    out
}

/// Whole screen for the active tab.
pub fn render(controller: &Controller) -> String {
    let mut out = String::new();
    match controller.active_tab() {
        Tab::Predict => {
            out.push_str("Measurements:\n");
            out.push_str(&render_form(controller.form()));
            if controller.is_loading() {
                out.push_str("Analyzing...\n");
            }
            if let Some(err) = controller.error() {
                let _ = writeln!(out, "Error: {}", err);
            }
            match controller.result() {
                Some(record) => out.push_str(&render_record(record)),
                None => out.push_str("Submit the measurements to see a prediction.\n"),
            }
        }
        Tab::History => {
            let _ = writeln!(out, "History ({} of 10):", controller.history().len());
            out.push_str(&render_history(controller.history()));
        }
    }
    out
}
