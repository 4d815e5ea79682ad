//! Timeline Rendering
//!
//! Loads a session, runs one full rebuild and prints the resulting snapshot,
//! either as JSON for other tools or as a colored listing for people.
//!
//! ```text
//! timeweave.hcl
//! load_session
//! VisualizerModel
//! TimelineSnapshot
//! TimelineView (json) / render_pretty
//! ```

use crate::conf::load_session;
use crate::event::Timestamp;
use crate::logging::OutputMode;
use crate::model::{TimeRange, TimelineSnapshot, VisualizerModel};
use crate::output::OutputId;
use crate::timeline::{Activity, ActivityKind, TimelineEvent, TimelineEventKind};
use chrono::TimeDelta;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub fn run_show(path: PathBuf, mode: OutputMode) -> anyhow::Result<()> {
    let session = load_session(&path)?;
    let model = VisualizerModel::with_defaults(Arc::new(session.into_catalog()))?;
    let snapshot = model.snapshot();

    match mode {
        OutputMode::Json => render_json(&snapshot)?,
        OutputMode::Pretty => render_pretty(&snapshot),
    }

    Ok(())
}

//-----------------------------------------------------------------------------
// JSON view
//-----------------------------------------------------------------------------

/// Serializable view of a snapshot with aligned times resolved.
#[derive(Debug, Serialize)]
pub struct TimelineView<'a> {
    pub origin: Option<Timestamp>,
    pub available_range: Option<TimeRange>,
    pub outputs: Vec<OutputView<'a>>,
    pub activities: Vec<ActivityView<'a>>,
    pub events: Vec<EventView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OutputView<'a> {
    pub id: &'a OutputId,
    pub sequence_diagram_name: Option<&'a str>,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub timeline_offset: TimeDelta,
}

#[derive(Debug, Serialize)]
pub struct ActivityView<'a> {
    #[serde(flatten)]
    pub activity: &'a Activity,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub aligned_begin: TimeDelta,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub aligned_end: TimeDelta,
    /// Owner of the other side of a paired network activity.
    pub paired_with: Option<&'a OutputId>,
}

#[derive(Debug, Serialize)]
pub struct EventView<'a> {
    #[serde(flatten)]
    pub event: &'a TimelineEvent,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub aligned: TimeDelta,
}

impl<'a> TimelineView<'a> {
    pub fn new(snapshot: &'a TimelineSnapshot) -> Self {
        let comparer = &snapshot.comparer;

        Self {
            origin: snapshot.origin,
            available_range: snapshot.available_range,
            outputs: snapshot
                .outputs
                .iter()
                .map(|o| OutputView {
                    id: o.id(),
                    sequence_diagram_name: snapshot.sequence_diagram_name(o.id()),
                    timeline_offset: comparer.offset_of(o.id()),
                })
                .collect(),
            activities: snapshot
                .activities
                .iter()
                .map(|a| ActivityView {
                    activity: a.as_ref(),
                    aligned_begin: comparer.activity_begin(a),
                    aligned_end: comparer.activity_end(a),
                    paired_with: counterpart(snapshot, a),
                })
                .collect(),
            events: snapshot
                .events
                .iter()
                .map(|e| EventView {
                    event: e.as_ref(),
                    aligned: comparer.align(e.time, &e.owner),
                })
                .collect(),
        }
    }
}

fn counterpart<'a>(
    snapshot: &'a TimelineSnapshot,
    activity: &Arc<Activity>,
) -> Option<&'a OutputId> {
    let pair = snapshot.paired_activities(activity)?;
    let other = if Arc::ptr_eq(&pair.outgoing, activity) {
        &pair.incoming
    } else {
        &pair.outgoing
    };
    Some(&other.begin_owner)
}

fn render_json(snapshot: &TimelineSnapshot) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(&TimelineView::new(snapshot))?;
    println!("{s}");
    Ok(())
}

//-----------------------------------------------------------------------------
// Pretty rendering
//-----------------------------------------------------------------------------

fn render_pretty(snapshot: &TimelineSnapshot) {
    let Some(origin) = snapshot.origin else {
        println!("{}", "no records in any visible source".yellow());
        return;
    };

    let span = snapshot
        .available_range
        .map(|r| r.duration())
        .unwrap_or_default();
    println!(
        "{} {}  {} {}",
        "origin".bold(),
        origin.to_rfc3339(),
        "span".bold(),
        format_offset(span)
    );

    println!("\n{}", "lanes".bold());
    for output in &snapshot.outputs {
        println!(
            "  {} {} {}",
            lane_name(snapshot, output.id()).cyan(),
            output.id().dimmed(),
            format_offset(snapshot.comparer.offset_of(output.id()))
        );
    }

    println!("\n{}", "activities".bold());
    for activity in &snapshot.activities {
        let begin = snapshot.comparer.activity_begin(activity);
        let end = snapshot.comparer.activity_end(activity);
        print!(
            "  [{:>12} .. {:>12}] {} {}",
            format_offset(begin),
            format_offset(end),
            activity.display_name,
            format!("({})", lane_name(snapshot, &activity.begin_owner)).dimmed()
        );
        print!(" {}", kind_label(activity.kind).blue());
        if activity.is_error {
            print!(" {}", "error".red().bold());
        }
        if activity.is_ended_forcefully {
            print!(" {}", "unfinished".yellow());
        }
        if let Some(other) = counterpart(snapshot, activity) {
            print!(" ⇄ {}", lane_name(snapshot, other).green());
        }
        println!();
    }

    println!("\n{}", "events".bold());
    for event in &snapshot.events {
        println!(
            "  [{:>12}] {} {} {}",
            format_offset(snapshot.comparer.align(event.time, &event.owner)),
            event.display_name,
            format!("({})", lane_name(snapshot, &event.owner)).dimmed(),
            event_label(event.kind).blue()
        );
    }
}

fn lane_name<'a>(snapshot: &'a TimelineSnapshot, id: &'a OutputId) -> &'a str {
    snapshot.sequence_diagram_name(id).unwrap_or(id.as_str())
}

fn kind_label(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Lifespan => "lifespan",
        ActivityKind::Procedure => "procedure",
        ActivityKind::OutgoingNetworking => "outgoing",
        ActivityKind::IncomingNetworking => "incoming",
    }
}

fn event_label(kind: TimelineEventKind) -> &'static str {
    match kind {
        TimelineEventKind::UserAction => "user action",
        TimelineEventKind::ApiCall => "api call",
    }
}

/// `+1.250ms` style rendering of an aligned time.
pub fn format_offset(delta: TimeDelta) -> String {
    let micros = delta.num_microseconds().unwrap_or(i64::MAX);
    format!("{:+.3}ms", micros as f64 / 1000.0)
}
