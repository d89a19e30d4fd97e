//! Instruction list pane rendering

use crate::diff::TransitionState;
use crate::trace::PlannedInstruction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn value_text(state: Option<&TransitionState>) -> Option<String> {
    let state = state?;
    let value = state.value.as_ref()?;
    Some(match (&state.key, value) {
        (Some(key), value) => format!("{}: {}", key, value),
        (None, value) => value.to_string(),
    })
}

/// One-line summary of what an instruction changes
fn change_summary(planned: &PlannedInstruction) -> String {
    let instruction = &planned.instruction;
    let from = value_text(instruction.from.as_ref());
    let to = value_text(instruction.to.as_ref());
    let moved = instruction
        .from
        .as_ref()
        .and_then(|s| s.index)
        .zip(instruction.to.as_ref().and_then(|s| s.index))
        .filter(|(a, b)| a != b);

    match (from, to, moved) {
        (_, Some(to), Some((a, b))) => format!("{} @{}→{}", to, a, b),
        (Some(from), Some(to), None) => format!("{} → {}", from, to),
        (None, Some(to), None) => format!("+ {}", to),
        (Some(from), None, _) => format!("- {}", from),
        (None, None, _) => String::new(),
    }
}

/// Render the instruction list, keeping the current step in view
pub fn render_instruction_pane(
    frame: &mut Frame,
    area: Rect,
    plan: &[PlannedInstruction],
    current_step: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Instructions ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if plan.is_empty() {
        let paragraph = Paragraph::new("(no changes recorded)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if current_step < *scroll_offset {
        *scroll_offset = current_step;
    } else if current_step >= *scroll_offset + visible_height {
        *scroll_offset = current_step + 1 - visible_height;
    }
    *scroll_offset = (*scroll_offset).min(plan.len().saturating_sub(visible_height));

    let items: Vec<ListItem> = plan
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, planned)| {
            let verb = planned.instruction.verb;
            let mut line = Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format!("{:<7}", verb.as_str()),
                    Style::default().fg(DEFAULT_THEME.verb_color(verb)),
                ),
                Span::styled(
                    format!(" {:<14}", planned.instruction.target_id),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Span::styled(change_summary(planned), Style::default().fg(DEFAULT_THEME.comment)),
            ]);
            if i == current_step {
                line = line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
