//! Interactive list selection.
//!
//! On a terminal the choices are shown in a popup list; otherwise a numbered
//! list is printed and a number is read from stdin. Invalid input is retried.

use std::io::{self, BufRead, Write};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::tty::IsTty;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    DefaultTerminal, Frame,
};

use crate::constants;
use crate::theme;

/// Let the user pick one of `items`. Returns `None` when cancelled.
pub fn pick(title: &str, items: &[String]) -> Result<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    if io::stdin().is_tty() && io::stdout().is_tty() {
        let mut terminal = ratatui::init();
        let result = run_popup(&mut terminal, title, items);
        ratatui::restore();
        result
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        Ok(prompt_choice(&mut input, &mut output, title, items)?)
    }
}

/// Numbered prompt. `q` or end of input cancels.
pub fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
    items: &[String],
) -> io::Result<Option<usize>> {
    writeln!(output, "{title}:")?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "  [{}] {item}", i + 1)?;
    }

    loop {
        write!(output, "\n  > ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match choice.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => writeln!(output, "  {}", constants::CLI_MSG_INVALID_CHOICE)?,
        }
    }
}

fn run_popup(terminal: &mut DefaultTerminal, title: &str, items: &[String]) -> Result<Option<usize>> {
    let mut list_state = ListState::default().with_selected(Some(0));

    loop {
        terminal.draw(|frame| render(frame, items, &mut list_state, title))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let selected = list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                list_state.select(Some(selected.checked_sub(1).unwrap_or(items.len() - 1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list_state.select(Some((selected + 1) % items.len()));
            }
            KeyCode::Home | KeyCode::Char('g') => list_state.select(Some(0)),
            KeyCode::End | KeyCode::Char('G') => list_state.select(Some(items.len() - 1)),
            KeyCode::Enter => return Ok(Some(selected)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
            KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
            _ => {}
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render(frame: &mut Frame, items: &[String], list_state: &mut ListState, title: &str) {
    let max_label_len = items.iter().map(String::len).max().unwrap_or(20);
    let width = (max_label_len + 8)
        .max(title.len() + 4)
        .max(constants::PICKER_FOOTER.len() + 2)
        .min(usize::from(frame.area().width)) as u16;
    let height = (items.len() + 2).min(20) as u16;

    let area = centered_rect(width, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(format!(" {title} "))
        .title_bottom(
            Line::from(Span::styled(
                constants::PICKER_FOOTER,
                Style::default().fg(theme::TEXT_SECONDARY),
            ))
            .centered(),
        );

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", i + 1),
                    Style::default()
                        .fg(theme::ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(item.as_str(), Style::default().fg(theme::TEXT_PRIMARY)),
            ]))
        })
        .collect();

    let list = List::new(list_items)
        .highlight_style(
            Style::default()
                .bg(theme::ROW_SELECTED_BG)
                .fg(theme::ROW_SELECTED_FG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, inner, list_state);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn items() -> Vec<String> {
        vec![
            "uni/infra/funcprof/accbundle-vpc-a".to_string(),
            "uni/infra/funcprof/accbundle-vpc-b".to_string(),
        ]
    }

    fn run(input: &str) -> (Option<usize>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let choice = prompt_choice(&mut reader, &mut out, "Pick", &items()).unwrap();
        (choice, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prompt_valid_choice() {
        let (choice, out) = run("2\n");
        assert_eq!(choice, Some(1));
        assert!(out.contains("[1] uni/infra/funcprof/accbundle-vpc-a"));
        assert!(out.contains("[2] uni/infra/funcprof/accbundle-vpc-b"));
    }

    #[test]
    fn test_prompt_retries_invalid_input() {
        let (choice, out) = run("abc\n0\n3\n1\n");
        assert_eq!(choice, Some(0));
        assert_eq!(out.matches("Invalid choice").count(), 3);
    }

    #[test]
    fn test_prompt_quit_and_eof_cancel() {
        assert_eq!(run("Q\n").0, None);
        assert_eq!(run("").0, None);
        assert_eq!(run("9\n").0, None);
    }

    #[test]
    fn test_pick_empty_list() {
        assert_eq!(pick("Pick", &[]).unwrap(), None);
    }

    #[test]
    fn test_render_highlights_selection() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let mut state = ListState::default().with_selected(Some(1));
        terminal
            .draw(|frame| render(frame, &items(), &mut state, "Pick"))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Pick"));
        assert!(text.contains("▶"));
        assert!(text.contains("accbundle-vpc-b"));
    }
}
