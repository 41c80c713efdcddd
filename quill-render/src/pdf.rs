use chrono::{DateTime, Utc};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rect, Rgb,
};
use quill_core::{JobDescriptor, TaskRecord, TaskStatus};

use crate::analytics::{insights, recommendations, Analytics};
use crate::error::{RenderError, RenderResult};
use crate::stats::{ReportStats, TimingAnalysis};

/// Cap on individually listed records; everything past it is summarized
/// in an "N more not shown" footer so output size stays bounded
pub const MAX_LISTED_RECORDS: usize = 50;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const FOOTER_SPACE: f32 = 22.0;

// Points to millimetres
const PT_MM: f32 = 0.3528;

type RgbTuple = (f32, f32, f32);

const INDIGO: RgbTuple = (0.31, 0.27, 0.90);
const GRAY: RgbTuple = (0.42, 0.45, 0.50);
const LIGHT_GRAY: RgbTuple = (0.90, 0.91, 0.92);
const INK: RgbTuple = (0.07, 0.09, 0.15);
const BODY: RgbTuple = (0.22, 0.25, 0.32);
const GREEN: RgbTuple = (0.06, 0.73, 0.51);
const AMBER: RgbTuple = (0.96, 0.62, 0.04);
const RED: RgbTuple = (0.94, 0.27, 0.27);
const PURPLE: RgbTuple = (0.49, 0.23, 0.93);
const TEAL: RgbTuple = (0.02, 0.59, 0.41);

fn color(rgb: RgbTuple) -> Color {
    Color::Rgb(Rgb::new(rgb.0, rgb.1, rgb.2, None))
}

fn status_color(status: TaskStatus) -> RgbTuple {
    match status {
        TaskStatus::Done => GREEN,
        TaskStatus::InProgress => AMBER,
        TaskStatus::Todo => GRAY,
    }
}

/// Cursor-based page writer over printpdf's bottom-left coordinate space.
/// Tracks a top-down cursor in millimetres and breaks pages when a block
/// would collide with the footer area.
struct PageWriter {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    cursor: f32,
}

impl PageWriter {
    fn new(title: &str) -> RenderResult<Self> {
        let (doc, page, layer_index) =
            PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer_index);

        Ok(Self {
            doc,
            regular,
            bold,
            pages: vec![(page, layer_index)],
            layer,
            cursor: MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer_index) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "content");
        self.layer = self.doc.get_page(page).get_layer(layer_index);
        self.pages.push((page, layer_index));
        self.cursor = MARGIN;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.cursor + needed > PAGE_H - FOOTER_SPACE {
            self.new_page();
        }
    }

    fn spacer(&mut self, mm: f32) {
        self.cursor += mm;
    }

    fn fill_rect(layer: &PdfLayerReference, x: f32, top: f32, w: f32, h: f32, rgb: RgbTuple) {
        layer.set_fill_color(color(rgb));
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_H - top - h),
            Mm(x + w),
            Mm(PAGE_H - top),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
    }

    /// Draw text at the cursor and advance it by one line
    fn text(&mut self, content: &str, size: f32, rgb: RgbTuple, bold: bool, indent: f32) {
        let line = size * PT_MM * 1.45;
        self.ensure_room(line);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(rgb));
        self.layer.use_text(
            content,
            size,
            Mm(MARGIN + indent),
            Mm(PAGE_H - self.cursor - size * PT_MM),
            font,
        );
        self.cursor += line;
    }

    /// Word-wrapped paragraph at body size
    fn paragraph(&mut self, content: &str, size: f32, rgb: RgbTuple, indent: f32) {
        let usable = PAGE_W - 2.0 * MARGIN - indent;
        // Average Helvetica glyph advance is roughly half the point size
        let max_chars = (usable / (size * PT_MM * 0.5)).max(10.0) as usize;
        for line in wrap(content, max_chars) {
            self.text(&line, size, rgb, false, indent);
        }
    }

    /// Section heading with a colored underline bar
    fn heading(&mut self, title: &str, rgb: RgbTuple) {
        self.ensure_room(18.0);
        self.text(title, 18.0, rgb, true, 0.0);
        Self::fill_rect(&self.layer, MARGIN, self.cursor, 70.0, 0.8, rgb);
        self.cursor += 6.0;
    }

    /// Horizontal proportion bar with a trailing "label (n) pct%" caption
    fn bar(&mut self, label: &str, value: usize, total: usize, rgb: RgbTuple) {
        const BAR_W: f32 = 110.0;
        const BAR_H: f32 = 7.0;
        self.ensure_room(BAR_H + 4.0);

        let ratio = if total == 0 {
            0.0
        } else {
            value as f32 / total as f32
        };
        Self::fill_rect(&self.layer, MARGIN, self.cursor, BAR_W, BAR_H, LIGHT_GRAY);
        if ratio > 0.0 {
            Self::fill_rect(&self.layer, MARGIN, self.cursor, BAR_W * ratio, BAR_H, rgb);
        }

        self.layer.set_fill_color(color(BODY));
        self.layer.use_text(
            format!("{} ({})  {:.0}%", label, value, ratio * 100.0),
            10.0,
            Mm(MARGIN + BAR_W + 5.0),
            Mm(PAGE_H - self.cursor - BAR_H * 0.75),
            &self.regular,
        );
        self.cursor += BAR_H + 4.0;
    }

    /// Row of outlined metric boxes: big value over a small label
    fn metric_row(&mut self, metrics: &[(String, &str, RgbTuple)]) {
        const BOX_H: f32 = 26.0;
        self.ensure_room(BOX_H + 6.0);
        let gap = 4.0;
        let box_w =
            (PAGE_W - 2.0 * MARGIN - gap * (metrics.len() as f32 - 1.0)) / metrics.len() as f32;

        for (i, (value, label, rgb)) in metrics.iter().enumerate() {
            let x = MARGIN + i as f32 * (box_w + gap);

            self.layer.set_outline_color(color(LIGHT_GRAY));
            let frame = Rect::new(
                Mm(x),
                Mm(PAGE_H - self.cursor - BOX_H),
                Mm(x + box_w),
                Mm(PAGE_H - self.cursor),
            )
            .with_mode(PaintMode::Stroke);
            self.layer.add_rect(frame);

            let value_size = 18.0;
            let value_x = x + (box_w - value.len() as f32 * value_size * PT_MM * 0.5) / 2.0;
            self.layer.set_fill_color(color(*rgb));
            self.layer.use_text(
                value.clone(),
                value_size,
                Mm(value_x.max(x + 1.0)),
                Mm(PAGE_H - self.cursor - 10.0),
                &self.bold,
            );

            let label_x = x + (box_w - label.len() as f32 * 9.0 * PT_MM * 0.5) / 2.0;
            self.layer.set_fill_color(color(GRAY));
            self.layer.use_text(
                label.to_string(),
                9.0,
                Mm(label_x.max(x + 1.0)),
                Mm(PAGE_H - self.cursor - BOX_H + 4.0),
                &self.regular,
            );
        }
        self.cursor += BOX_H + 6.0;
    }

    /// Single wide progress bar with the percentage printed inside
    fn progress_bar(&mut self, percentage: f64, rgb: RgbTuple) {
        const BAR_W: f32 = PAGE_W - 2.0 * MARGIN;
        const BAR_H: f32 = 9.0;
        self.ensure_room(BAR_H + 5.0);

        let ratio = (percentage / 100.0).clamp(0.0, 1.0) as f32;
        Self::fill_rect(&self.layer, MARGIN, self.cursor, BAR_W, BAR_H, LIGHT_GRAY);
        if ratio > 0.0 {
            Self::fill_rect(&self.layer, MARGIN, self.cursor, BAR_W * ratio, BAR_H, rgb);
        }

        self.layer.set_fill_color(color(INK));
        self.layer.use_text(
            format!("{:.1}%", percentage),
            11.0,
            Mm(MARGIN + BAR_W / 2.0 - 6.0),
            Mm(PAGE_H - self.cursor - BAR_H * 0.75),
            &self.bold,
        );
        self.cursor += BAR_H + 5.0;
    }

    fn divider(&mut self) {
        self.ensure_room(4.0);
        Self::fill_rect(
            &self.layer,
            MARGIN,
            self.cursor,
            PAGE_W - 2.0 * MARGIN,
            0.3,
            LIGHT_GRAY,
        );
        self.cursor += 3.0;
    }

    /// Stamp "Page i of N" footers on every page, then serialize
    fn finish(self) -> RenderResult<Vec<u8>> {
        let total = self.pages.len();
        for (i, (page, layer_index)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer_index);
            Self::fill_rect(
                &layer,
                MARGIN,
                PAGE_H - 16.0,
                PAGE_W - 2.0 * MARGIN,
                0.3,
                LIGHT_GRAY,
            );
            layer.set_fill_color(color(GRAY));
            layer.use_text(
                format!("Page {} of {}", i + 1, total),
                9.0,
                Mm(PAGE_W / 2.0 - 8.0),
                Mm(11.0),
                &self.regular,
            );
        }

        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

pub(crate) fn render_document(
    descriptor: &JobDescriptor,
    records: &[TaskRecord],
    stats: &ReportStats,
    timing: &TimingAnalysis,
    analytics: &Analytics,
    now: DateTime<Utc>,
) -> RenderResult<Vec<u8>> {
    let mut w = PageWriter::new("Task Management Report")?;

    cover_page(&mut w, descriptor, now);
    executive_summary(&mut w, stats, analytics);
    statistics_section(&mut w, stats, timing);
    analytics_section(&mut w, analytics);
    task_list(&mut w, records);
    recommendations_section(&mut w, stats);

    w.finish()
}

fn cover_page(w: &mut PageWriter, descriptor: &JobDescriptor, now: DateTime<Utc>) {
    w.spacer(40.0);
    w.text("Task Manager", 34.0, INDIGO, true, 42.0);
    w.spacer(2.0);
    w.text("Analytics Report", 24.0, GRAY, false, 54.0);
    w.spacer(30.0);

    w.text("Report Details", 14.0, INK, true, 10.0);
    w.spacer(3.0);
    w.text(
        &format!("Owner: {}", descriptor.owner_id),
        11.0,
        BODY,
        false,
        10.0,
    );
    w.text(
        &format!("Report Kind: {}", descriptor.report_kind),
        11.0,
        BODY,
        false,
        10.0,
    );
    w.text(
        &format!("Job ID: {}", descriptor.job_id),
        11.0,
        BODY,
        false,
        10.0,
    );
    w.text(
        &format!("Submitted: {}", descriptor.submitted_at.to_rfc3339()),
        11.0,
        BODY,
        false,
        10.0,
    );
    w.text(
        &format!("Generated: {}", now.to_rfc3339()),
        11.0,
        BODY,
        false,
        10.0,
    );
}

fn executive_summary(w: &mut PageWriter, stats: &ReportStats, analytics: &Analytics) {
    w.new_page();
    w.heading("Executive Summary", INDIGO);

    let completion_rate = (stats.completion_ratio() * 100.0).round();
    w.metric_row(&[
        (stats.total.to_string(), "Total Tasks", INDIGO),
        (format!("{:.0}%", completion_rate), "Completed", GREEN),
        (stats.in_progress.to_string(), "In Progress", AMBER),
        (stats.todo.to_string(), "To Do", GRAY),
    ]);

    w.spacer(4.0);
    w.text("Overview", 11.0, INK, true, 0.0);
    w.spacer(1.0);
    w.paragraph(
        &format!(
            "This report provides a comprehensive analysis of {} tasks managed by the user. \
             The completion rate stands at {:.0}%, with {} tasks currently in progress. \
             Priority distribution shows {} high-priority tasks requiring immediate attention.",
            stats.total, completion_rate, stats.in_progress, stats.high_priority
        ),
        10.0,
        BODY,
        0.0,
    );

    w.spacer(4.0);
    w.text("Key Insights", 11.0, INK, true, 0.0);
    w.spacer(1.0);
    for insight in insights(stats, analytics) {
        w.paragraph(&format!("- {}", insight), 10.0, BODY, 3.0);
    }
}

fn statistics_section(w: &mut PageWriter, stats: &ReportStats, timing: &TimingAnalysis) {
    w.new_page();
    w.heading("Task Statistics", PURPLE);

    w.text("Status Distribution", 13.0, INK, true, 0.0);
    w.spacer(2.0);
    w.bar("Completed", stats.completed, stats.total, GREEN);
    w.bar("In Progress", stats.in_progress, stats.total, AMBER);
    w.bar("To Do", stats.todo, stats.total, GRAY);

    w.spacer(6.0);
    w.text("Priority Distribution", 13.0, INK, true, 0.0);
    w.spacer(2.0);
    w.bar("High", stats.high_priority, stats.total, RED);
    w.bar("Medium", stats.medium_priority, stats.total, AMBER);
    w.bar("Low", stats.low_priority, stats.total, GRAY);

    w.spacer(6.0);
    w.text("Time-Based Analysis", 13.0, INK, true, 0.0);
    w.spacer(2.0);
    w.text(
        &format!("Average Task Age: {:.0} days", timing.avg_age_days),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!("Oldest Task: {} days", timing.oldest_age_days),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!("Newest Task: {} days", timing.newest_age_days),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!("Tasks Created This Week: {}", timing.created_this_week),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!("Tasks Created This Month: {}", timing.created_this_month),
        10.0,
        BODY,
        false,
        0.0,
    );
}

fn analytics_section(w: &mut PageWriter, analytics: &Analytics) {
    w.new_page();
    w.heading("Detailed Analytics", TEAL);

    w.text("Productivity Score", 12.0, INK, true, 0.0);
    w.spacer(2.0);
    w.progress_bar(analytics.productivity_score, GREEN);
    w.paragraph(
        &format!(
            "Your productivity score is {:.1}% based on task completion rates, priority \
             management, and time-to-completion metrics.",
            analytics.productivity_score
        ),
        10.0,
        BODY,
        0.0,
    );

    w.spacer(5.0);
    w.text("Task Completion Velocity", 12.0, INK, true, 0.0);
    w.spacer(1.0);
    w.text(
        &format!("Average Completion Rate: {:.2} tasks per day", analytics.velocity),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!(
            "Estimated Time to Complete Remaining: {} days",
            analytics.estimated_completion_days
        ),
        10.0,
        BODY,
        false,
        0.0,
    );

    w.spacer(5.0);
    w.text("Workload Balance Analysis", 12.0, INK, true, 0.0);
    w.spacer(1.0);
    w.text(
        &format!("Current Workload: {}", analytics.workload.as_str()),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!(
            "Task Distribution Score: {:.1}/10",
            analytics.distribution_score
        ),
        10.0,
        BODY,
        false,
        0.0,
    );
    w.text(
        &format!("Recommended Daily Tasks: {}", analytics.recommended_daily),
        10.0,
        BODY,
        false,
        0.0,
    );
}

fn task_list(w: &mut PageWriter, records: &[TaskRecord]) {
    w.new_page();
    w.heading("Task List", RED);

    if records.is_empty() {
        w.text("No tasks found.", 11.0, GRAY, false, 0.0);
        return;
    }

    let shown = &records[..records.len().min(MAX_LISTED_RECORDS)];
    w.text(
        &format!("Showing {} of {} tasks", shown.len(), records.len()),
        10.0,
        GRAY,
        false,
        0.0,
    );
    w.spacer(4.0);

    for (index, record) in shown.iter().enumerate() {
        w.ensure_room(22.0);
        w.text(
            &format!("{}. {}", index + 1, truncate(&record.title, 90)),
            11.0,
            INK,
            true,
            0.0,
        );
        w.text(
            &format!(
                "{} | {} priority",
                record.status.as_str().to_uppercase(),
                record.priority.as_str().to_uppercase()
            ),
            9.0,
            status_color(record.status),
            false,
            4.0,
        );
        if let Some(description) = &record.description {
            w.paragraph(&truncate(description, 150), 9.0, GRAY, 4.0);
        }
        if let Some(created_at) = record.created_at {
            w.text(
                &format!("Created: {}", created_at.format("%Y-%m-%d")),
                8.0,
                GRAY,
                false,
                4.0,
            );
        }
        if index < shown.len() - 1 {
            w.divider();
        }
    }

    if records.len() > MAX_LISTED_RECORDS {
        w.spacer(4.0);
        w.text(
            &format!(
                "... and {} more tasks not shown in this report.",
                records.len() - MAX_LISTED_RECORDS
            ),
            10.0,
            GRAY,
            false,
            0.0,
        );
    }
}

fn recommendations_section(w: &mut PageWriter, stats: &ReportStats) {
    w.new_page();
    w.heading("Recommendations", AMBER);

    w.paragraph(
        "Based on the analysis of your tasks, here are some actionable recommendations to \
         improve productivity:",
        10.0,
        BODY,
        0.0,
    );
    w.spacer(4.0);

    for (index, rec) in recommendations(stats).iter().enumerate() {
        w.ensure_room(20.0);
        w.text(
            &format!("{}. {}", index + 1, rec.title),
            11.0,
            INK,
            true,
            0.0,
        );
        w.paragraph(&rec.description, 10.0, BODY, 4.0);
        w.text(
            &format!("Priority: {} | Impact: {}", rec.priority, rec.impact),
            9.0,
            GRAY,
            false,
            4.0,
        );
        w.spacer(3.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_word_boundaries() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }
}
