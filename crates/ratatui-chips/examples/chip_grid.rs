use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_chips::chip_grid::ChipGrid;
use ratatui_chips::chip_grid::ChipGridAction;
use ratatui_chips::chip_listbox::ChipListbox;
use ratatui_chips::chip_listbox::ChipListboxOptions;
use ratatui_chips::crossterm_input::input_event_from_crossterm;
use ratatui_chips::input::InputEvent;
use ratatui_chips::input::KeyCode;
use ratatui_chips::theme::Theme;
use std::io;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pane {
    Tags,
    Filters,
}

struct App {
    tags: ChipGrid,
    filters: ChipListbox,
    pane: Pane,
    status: String,
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();

    let mut tags = ChipGrid::new();
    for t in [
        "rust", "tui", "ratatui", "crossterm", "keyboard", "focus", "chips", "grid", "a11y",
    ] {
        tags.add_chip(t);
    }
    tags.focus();

    let mut filters = ChipListbox::with_options(ChipListboxOptions {
        multiple: true,
        ..Default::default()
    });
    for f in ["open", "closed", "draft", "merged"] {
        filters.add_chip(f);
    }

    let mut app = App {
        tags,
        filters,
        pane: Pane::Tags,
        status: String::new(),
    };

    let res = run(&mut terminal, &theme, &mut app);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let block = Block::default()
                .title("Chips (←→↑↓, Home/End, Del, Space, Tab switches pane, q quits)")
                .borders(Borders::ALL);
            let inner = block.inner(area);
            f.render_widget(block, area);

            let buf = f.buffer_mut();
            let tags_area = Rect::new(
                inner.x,
                inner.y,
                inner.width,
                inner.height.saturating_sub(4),
            );
            let filters_area = Rect::new(inner.x, tags_area.bottom() + 1, inner.width, 1);
            let help_area = Rect::new(inner.x, filters_area.bottom() + 1, inner.width, 1);

            app.tags.render(tags_area, buf, theme);
            app.filters.render(filters_area, buf, theme);
            render_help(help_area, buf, theme, app);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Some(ev) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };

        if let InputEvent::Key(key) = &ev {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::BackTab => {
                    switch_pane(app);
                    continue;
                }
                _ => {}
            }
        }

        if let InputEvent::Mouse(_) = ev {
            // Clicks go to both panes; each ignores clicks outside its chips.
            if app.tags.handle_event(ev.clone()) != ChipGridAction::None {
                app.pane = Pane::Tags;
                app.filters.blur();
            } else {
                app.filters.handle_event(ev);
                if app.filters.has_focus() {
                    app.pane = Pane::Filters;
                    app.tags.blur();
                }
            }
            continue;
        }

        match app.pane {
            Pane::Tags => {
                if let ChipGridAction::Removed { label, .. } = app.tags.handle_event(ev) {
                    app.status = format!("removed {label}");
                }
            }
            Pane::Filters => {
                app.filters.handle_event(ev);
            }
        }
    }
}

fn switch_pane(app: &mut App) {
    match app.pane {
        Pane::Tags => {
            app.tags.blur();
            app.filters.focus();
            app.pane = Pane::Filters;
        }
        Pane::Filters => {
            app.filters.blur();
            app.tags.focus();
            app.pane = Pane::Tags;
        }
    }
}

fn render_help(area: Rect, buf: &mut ratatui::buffer::Buffer, theme: &Theme, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let hints = app
        .tags
        .bindings()
        .help()
        .iter()
        .map(|b| format!("{} {}", b.help_key, b.help_desc))
        .collect::<Vec<_>>()
        .join(" • ");
    let filters = app
        .filters
        .selected()
        .iter()
        .filter_map(|id| app.filters.chip(*id).map(|c| c.label().to_string()))
        .collect::<Vec<_>>()
        .join(",");
    let s = format!("{hints}  filters=[{filters}]  {}", app.status);
    let span = Span::styled(s, theme.text_muted);
    buf.set_span(area.x, area.y, &span, area.width);
}
