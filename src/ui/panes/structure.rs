//! Structure pane: draws the visual elements of one trace step

use crate::animation::{AnimationInstruction, AnimationVerb};
use crate::structures::{ElementRole, VisualElement};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Everything the structure pane needs for one frame
pub struct StructureRenderData<'a> {
    pub title: &'a str,
    pub step_label: &'a str,
    pub elements: &'a [VisualElement],
    /// Instruction being played, if any
    pub active: Option<&'a AnimationInstruction>,
    /// Eased progress through the active instruction
    pub fraction: f64,
    pub is_focused: bool,
}

pub fn render_structure_pane(frame: &mut Frame, area: Rect, data: &StructureRenderData) {
    let border_style = if data.is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", data.title))
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 1, 0, 0));

    let mut lines = vec![
        Line::from(Span::styled(
            data.step_label.to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        )),
        Line::from(""),
    ];

    if data.elements.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    } else {
        let styler = ElementStyler {
            active: data.active,
            fraction: data.fraction,
        };
        lines.extend(match &data.elements[0].role {
            ElementRole::Cell { .. } => cell_lines(data.elements, &styler),
            ElementRole::ListNode { .. } => list_lines(data.elements, &styler),
            ElementRole::Entry { .. } => bucket_lines(data.elements, &styler),
            ElementRole::TreeNode { .. } => tree_lines(data.elements, &styler),
            ElementRole::Vertex | ElementRole::Edge { .. } => graph_lines(data.elements, &styler),
        });
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Picks the style of each element given the instruction being played
struct ElementStyler<'a> {
    active: Option<&'a AnimationInstruction>,
    fraction: f64,
}

impl ElementStyler<'_> {
    fn style(&self, id: &str) -> Style {
        let Some(active) = self.active.filter(|a| a.target_id == id) else {
            return Style::default().fg(DEFAULT_THEME.structure);
        };

        let base = Style::default()
            .bg(DEFAULT_THEME.verb_color(active.verb))
            .fg(Color::Black);
        match active.verb {
            AnimationVerb::Delete | AnimationVerb::FadeOut if self.fraction >= 0.5 => {
                base.add_modifier(Modifier::CROSSED_OUT)
            }
            AnimationVerb::Insert | AnimationVerb::FadeIn if self.fraction < 0.5 => {
                base.add_modifier(Modifier::DIM)
            }
            _ => base.add_modifier(Modifier::BOLD),
        }
    }

    fn span(&self, element: &VisualElement, text: String) -> Span<'static> {
        Span::styled(text, self.style(&element.id))
    }
}

fn arrow() -> Span<'static> {
    Span::styled(" → ", Style::default().fg(DEFAULT_THEME.comment))
}

fn cell_lines(elements: &[VisualElement], styler: &ElementStyler) -> Vec<Line<'static>> {
    let mut boxes = Vec::new();
    let mut indices = Vec::new();
    for element in elements {
        let text = format!("[{:^5}]", element.label);
        let index = match element.role {
            ElementRole::Cell { index } => index,
            _ => continue,
        };
        indices.push(Span::styled(
            format!("{:^width$}", index, width = text.chars().count()),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
        boxes.push(styler.span(element, text));
    }
    vec![Line::from(boxes), Line::from(indices)]
}

fn list_lines(elements: &[VisualElement], styler: &ElementStyler) -> Vec<Line<'static>> {
    let circular = elements
        .iter()
        .any(|element| matches!(element.role, ElementRole::ListNode { circular: true, .. }));
    let mut spans = vec![Span::styled("head", Style::default().fg(DEFAULT_THEME.comment)), arrow()];
    for element in elements {
        spans.push(styler.span(element, format!("({})", element.label)));
        spans.push(arrow());
    }
    let end = if circular { "↺ head" } else { "null" };
    spans.push(Span::styled(end, Style::default().fg(DEFAULT_THEME.comment)));
    vec![Line::from(spans)]
}

fn bucket_lines(elements: &[VisualElement], styler: &ElementStyler) -> Vec<Line<'static>> {
    let mut buckets: BTreeMap<usize, Vec<&VisualElement>> = BTreeMap::new();
    for element in elements {
        if let ElementRole::Entry { bucket } = element.role {
            buckets.entry(bucket).or_default().push(element);
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, chain)| {
            let mut spans = vec![Span::styled(
                format!("{:>3} │ ", bucket),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            for (i, element) in chain.into_iter().enumerate() {
                if i > 0 {
                    spans.push(arrow());
                }
                spans.push(styler.span(element, element.label.clone()));
            }
            Line::from(spans)
        })
        .collect()
}

fn tree_lines(elements: &[VisualElement], styler: &ElementStyler) -> Vec<Line<'static>> {
    elements
        .iter()
        .filter_map(|element| match element.role {
            ElementRole::TreeNode { depth } => Some(Line::from(vec![
                Span::styled(
                    format!("{}{}", "   ".repeat(depth), if depth == 0 { "" } else { "└─ " }),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                styler.span(element, element.label.clone()),
            ])),
            _ => None,
        })
        .collect()
}

fn graph_lines(elements: &[VisualElement], styler: &ElementStyler) -> Vec<Line<'static>> {
    let labels: FxHashMap<&str, &str> = elements
        .iter()
        .filter(|e| e.role == ElementRole::Vertex)
        .map(|e| (e.id.as_str(), e.label.as_str()))
        .collect();

    elements
        .iter()
        .filter(|vertex| vertex.role == ElementRole::Vertex)
        .map(|vertex| {
            let mut spans = vec![styler.span(vertex, format!("{:<4}", vertex.label))];
            for edge in elements {
                let ElementRole::Edge { source, target } = &edge.role else {
                    continue;
                };
                if *source != vertex.id {
                    continue;
                }
                spans.push(arrow());
                let name = labels.get(target.as_str()).copied().unwrap_or(target.as_str());
                spans.push(styler.span(edge, name.to_string()));
                if !edge.label.is_empty() {
                    spans.push(Span::styled(
                        format!("({})", edge.label),
                        Style::default().fg(DEFAULT_THEME.edge_weight),
                    ));
                }
            }
            Line::from(spans)
        })
        .collect()
}
