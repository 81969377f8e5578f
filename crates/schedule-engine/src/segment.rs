//! Block segmentation: one span of text per course.
//!
//! A block runs from one course header to the next header (or end of text).
//! Text before the first header belongs to no course and is ignored.

use crate::patterns::{COURSE_HEADER, FINAL_EXAM_LITERAL, MEETING_HEAD};

/// One course's slice of the schedule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseBlock<'a> {
    pub department: &'a str,
    pub number: &'a str,
    pub title: &'a str,
    /// Header through the last character before the next header.
    pub span: &'a str,
}

impl CourseBlock<'_> {
    /// Display name used as the summary prefix, e.g. `CS 101 - Intro`.
    pub fn course_name(&self) -> String {
        if self.title.is_empty() {
            format!("{} {}", self.department, self.number)
        } else {
            format!("{} {} - {}", self.department, self.number, self.title)
        }
    }
}

/// Split normalized text into course blocks. No headers means no blocks.
pub fn segment(text: &str) -> Vec<CourseBlock<'_>> {
    let headers: Vec<_> = COURSE_HEADER.captures_iter(text).collect();

    headers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let block_end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());

            let title = cut_title(&text[whole.end()..block_end]);
            let block = CourseBlock {
                department: caps.name("dept")?.as_str(),
                number: caps.name("number")?.as_str(),
                title,
                span: &text[whole.start()..block_end],
            };
            tracing::debug!(course = %block.course_name(), "course block found");
            Some(block)
        })
        .collect()
}

/// The title ends at the earliest of: end of line, a meeting-time token, or
/// the `Final Exam:` literal. The next header is already excluded because
/// `rest` stops there.
fn cut_title(rest: &str) -> &str {
    let mut end = rest.find('\n').unwrap_or(rest.len());
    let line = &rest[..end];

    if let Some(m) = MEETING_HEAD.find(line) {
        end = end.min(m.start());
    }
    if let Some(pos) = line.find(FINAL_EXAM_LITERAL) {
        end = end.min(pos);
    }

    rest[..end].trim()
}
