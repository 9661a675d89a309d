use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use super::{App, Screen};
use crate::muscles::MuscleGroup;
use crate::selector::{intensity_color, MAX_INTENSITY};
use crate::session::{exercise_card, ExerciseCard};

const ACCENT: Color = Color::Rgb(0x7d, 0x29, 0x17);

impl App {
    pub(super) fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let title = match self.screen {
            Screen::Select => "Pick muscles",
            Screen::Amount => "How many exercises do you want to do?",
            Screen::Plan => "Your exercises",
            Screen::Workout => "Workout",
        };
        let header = Paragraph::new(format!("musclemap - {}", title))
            .style(Style::default().fg(Color::White).bg(ACCENT).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match self.screen {
            Screen::Select => self.render_select(frame, chunks[1]),
            Screen::Amount => self.render_amount(frame, chunks[1]),
            Screen::Plan => self.render_plan(frame, chunks[1]),
            Screen::Workout => self.render_workout(frame, chunks[1]),
        }

        let footer = Paragraph::new(self.key_hints())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn key_hints(&self) -> &'static str {
        match self.screen {
            Screen::Select => "q: quit | up/down: move | space: pick | r: reset | s: submit",
            Screen::Amount => "0-9: amount | enter: submit | esc: back",
            Screen::Plan if self.plan.is_generated() => {
                "q: quit | up/down: move | x: shuffle | n: next | esc: back"
            }
            Screen::Plan => "q: quit | g: generate workout | esc: back",
            Screen::Workout => "q: quit | left: previous | right: next | esc: back",
        }
    }

    fn render_select(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = MuscleGroup::all()
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let clicks = self.selector.clicks(*group);
                let rgb = intensity_color(clicks);
                let bar: String = (1..=MAX_INTENSITY)
                    .map(|level| if level <= clicks { '#' } else { '.' })
                    .collect();

                let mut style = Style::default().fg(Color::Rgb(rgb.0, rgb.1, rgb.2));
                if i == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Row::new(vec![
                    Cell::from(group.name()),
                    Cell::from(format!("[{}]", bar)),
                    Cell::from(clicks.to_string()),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(3),
            ],
        )
        .header(Row::new(vec!["Muscle", "Level", ""]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Muscles"));

        frame.render_widget(table, area);
    }

    fn render_amount(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(format!("Muscles: {:?}", self.selector.vector().values())),
            Line::from(""),
            Line::from(vec![
                Span::raw("Exercises: "),
                Span::styled(format!("{}_", self.amount_input), Style::default().bold()),
            ]),
        ];
        if let Some(err) = &self.amount_error {
            lines.push(Line::from(""));
            lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
        }

        let input = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(input, area);
    }

    fn render_plan(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(format!(
                "Per muscle: {:?} ({} total)",
                self.demand.values(),
                self.amount
            )),
            Line::from(""),
        ];

        if self.plan.names().is_empty() {
            lines.push(Line::styled("No workout begun.", Style::default().fg(Color::Gray)));
        } else {
            for (i, name) in self.plan.names().iter().enumerate() {
                let marker = if i == self.plan_cursor { "> " } else { "  " };
                let style = if i == self.plan_cursor {
                    Style::default().bold()
                } else {
                    Style::default()
                };
                lines.push(Line::styled(format!("{}{}", marker, name), style));
            }
        }

        if let Some(err) = self.plan.error() {
            lines.push(Line::from(""));
            lines.push(Line::styled(err.to_string(), Style::default().fg(Color::Red)));
        }
        if self.loading {
            lines.push(Line::from(""));
            lines.push(Line::styled("Loading...", Style::default().fg(ACCENT)));
        }

        let plan = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Plan"));
        frame.render_widget(plan, area);
    }

    fn render_workout(&self, frame: &mut Frame, area: Rect) {
        let Some(session) = &self.session else {
            let waiting = Paragraph::new("Loading exercises...")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(waiting, area);
            return;
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(area);

        if let Some(row) = session.peek_previous() {
            let card = exercise_card(&self.table, row);
            frame.render_widget(side_card(&card, "Previous"), columns[0]);
        }

        let title = session.progress();
        let current = match session.current() {
            Some(row) => main_card(&exercise_card(&self.table, row)),
            None => vec![Line::from("No exercises in this workout.")],
        };
        let card = Paragraph::new(current)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(card, columns[1]);

        if let Some(row) = session.peek_next() {
            let card = exercise_card(&self.table, row);
            frame.render_widget(side_card(&card, "Next"), columns[2]);
        }
    }
}

fn main_card(card: &ExerciseCard) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(card.name.clone(), Style::default().bold())];
    if let Some(focus) = &card.focus {
        lines.push(Line::styled(
            format!("[{}]", focus),
            Style::default().fg(ACCENT),
        ));
    }

    for (title, muscles) in [
        ("Primary Muscles:", &card.muscles.primary),
        ("Secondary Muscles:", &card.muscles.secondary),
    ] {
        lines.push(Line::from(""));
        lines.push(Line::styled(title, Style::default().bold()));
        if muscles.is_empty() {
            lines.push(Line::from("None"));
        }
        for muscle in muscles {
            lines.push(Line::from(muscle.clone()));
        }
    }
    lines
}

fn side_card(card: &ExerciseCard, title: &'static str) -> Paragraph<'static> {
    Paragraph::new(card.name.clone())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title))
}
