//! Drawing for the composer line, the session status, and the suggestion
//! popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::host::OverlayHost;
use crate::host::TextInputHost;
use crate::overlay::manager::OverlayView;
use crate::tui::app::App;
use crate::tui::composer::Composer;
use crate::tui::popup::PopupSurface;
use crate::tui::theme::Theme;
use crate::util::unicode;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let composer_area = app.composer_area;
    let log_area = Rect::new(
        area.x,
        area.y,
        area.width,
        area.height.saturating_sub(composer_area.height),
    );

    render_log(frame, app, log_area);
    render_composer(frame, &app.composer, &app.theme, composer_area);

    if let Some(view) = app.controller.overlay().view() {
        render_popup(
            frame,
            &view,
            app.controller.overlay().surface(),
            &app.theme,
        );
    }
}

/// Sent messages plus a one-line summary of the attached resources.
fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let mut lines: Vec<Line> = app
        .sent
        .iter()
        .map(|msg| {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(theme.dim)),
                Span::styled(msg.clone(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let mut status = format!("files: {}", app.resources.attached_files().len());
    if let Some(persona) = app.resources.persona() {
        status.push_str(&format!("  persona: {persona}"));
    }
    if let Some(docs) = app.resources.documentation() {
        status.push_str(&format!("  docs: {docs}"));
    }
    if app.resources.web_search() {
        status.push_str("  web");
    }
    lines.push(Line::from(Span::styled(
        status,
        Style::default().fg(theme.dim),
    )));

    // Keep the newest lines in view.
    let scroll = lines.len().saturating_sub(area.height as usize);
    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_composer(frame: &mut Frame, composer: &Composer, theme: &Theme, area: Rect) {
    if area.height < 3 {
        return;
    }
    let border = if composer.is_focused() {
        theme.accent
    } else {
        theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" message ", Style::default().fg(theme.dim)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = composer_line(composer, theme);
    frame.render_widget(Paragraph::new(line), inner);

    let cursor_x = inner.x
        + unicode::display_width(&composer.text()[..composer.caret()]).min(inner.width as usize)
            as u16;
    frame.set_cursor_position((cursor_x, inner.y));
}

/// Split the buffer into styled segments around the mention spans.
fn composer_line<'a>(composer: &'a Composer, theme: &Theme) -> Line<'a> {
    let text = composer.text();
    let mut marks: Vec<_> = composer.highlights().to_vec();
    marks.sort_by_key(|h| h.span.start);

    let mut spans: Vec<Span> = Vec::new();
    let mut pos = 0;
    for mark in marks {
        if mark.span.start > pos {
            spans.push(Span::styled(
                &text[pos..mark.span.start],
                Style::default().fg(theme.text),
            ));
        }
        let color = if mark.group_mention {
            theme.group_mention
        } else {
            theme.mention
        };
        spans.push(Span::styled(
            &text[mark.span.start..mark.span.end],
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        pos = mark.span.end;
    }
    if pos < text.len() {
        spans.push(Span::styled(
            &text[pos..],
            Style::default().fg(theme.text),
        ));
    }
    Line::from(spans)
}

/// Draw the suggestion popup from the manager's view and the surface
/// geometry the manager has been maintaining.
fn render_popup(frame: &mut Frame, view: &OverlayView<'_>, surface: &PopupSurface, theme: &Theme) {
    if !surface.is_visible() {
        return;
    }
    let size = surface.size();
    let location = surface.location();
    let popup_area =
        Rect::new(location.x, location.y, size.width, size.height).intersection(frame.area());
    if popup_area.width < 3 || popup_area.height < 3 {
        return;
    }

    let visible = popup_area.height.saturating_sub(2) as usize;
    // Scroll window around the selected item.
    let scroll_start = if view.selected >= visible && visible > 0 {
        view.selected - visible + 1
    } else {
        0
    };

    let inner_w = popup_area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (i, item) in view.items.iter().skip(scroll_start).take(visible).enumerate() {
        let is_selected = scroll_start + i == view.selected;
        let style = if is_selected {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(theme.background)
        };
        let prefix = if is_selected { " \u{25B8} " } else { "   " };
        let label = unicode::truncate_to_width(item.label(), inner_w.saturating_sub(3));
        let pad = inner_w
            .saturating_sub(unicode::display_width(prefix) + unicode::display_width(&label));
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(label, style),
            Span::styled(" ".repeat(pad), style),
        ]));
    }

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent).bg(theme.background))
        .style(Style::default().bg(theme.background));
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::config::MentionConfig;
    use crate::host::ScreenPoint;
    use crate::model::TextSpan;

    fn render_to_string(width: u16, height: u16, app: &App) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    fn demo_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let config = MentionConfig {
            root: Some(dir.path().to_path_buf()),
            index_depth: 0,
            ..MentionConfig::default()
        };
        let mut app = App::new(&config).unwrap();
        app.place(Rect::new(0, 0, 60, 20));
        (app, dir)
    }

    #[test]
    fn composer_box_is_drawn_at_the_bottom() {
        let (app, _dir) = demo_app();
        let output = render_to_string(60, 20, &app);
        assert!(output.contains(" message "));
    }

    #[test]
    fn open_overlay_lists_the_default_groups() {
        let (mut app, _dir) = demo_app();
        app.controller.overlay_mut().open(
            ScreenPoint { x: 1, y: 18 },
            TextSpan::new(0, 1),
        );
        let output = render_to_string(60, 20, &app);
        for label in ["Files", "Folders", "Personas", "Docs", "Web search"] {
            assert!(output.contains(label), "missing {label}");
        }
        // First entry carries the selection marker.
        assert!(output.contains("\u{25B8} Files"));
    }
}
