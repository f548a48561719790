use crate::interactive::ui::components::Component;
use crate::interactive::ui::events::Message;
use crate::search::SearchResults;
use crate::world::{GameState, ThingId, WorldObjectId};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// One row of the result list. Section headers are not selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section(String),
    Pawn(ThingId),
    Thing(ThingId),
    WorldObject(WorldObjectId),
}

impl Row {
    fn is_selectable(&self) -> bool {
        !matches!(self, Row::Section(_))
    }
}

#[derive(Default)]
pub struct ResultList {
    rows: Vec<(Row, String)>,
    selected: Option<usize>,
    list_state: ListState,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the rows from a fresh result set: one section per non-empty
    /// result kind, entries sorted by label so the unordered sets render
    /// stably.
    pub fn set_results(&mut self, results: &SearchResults, state: &GameState) {
        self.rows.clear();

        let mut pawns: Vec<(String, ThingId)> = results
            .pawns
            .iter()
            .filter_map(|&id| {
                state.thing(id).map(|(map, thing)| {
                    (
                        format!(
                            "{} - {} ({}, {})",
                            thing.label, map.name, thing.position.x, thing.position.z
                        ),
                        id,
                    )
                })
            })
            .collect();
        pawns.sort();

        let mut things: Vec<(String, ThingId)> = results
            .things
            .iter()
            .filter_map(|&id| {
                state.thing(id).map(|(map, thing)| {
                    (
                        format!(
                            "{} - {} ({}, {})",
                            thing.label, map.name, thing.position.x, thing.position.z
                        ),
                        id,
                    )
                })
            })
            .collect();
        things.sort();

        let mut world_objects: Vec<(String, WorldObjectId)> = results
            .world_objects
            .iter()
            .filter_map(|&id| {
                state
                    .world_object(id)
                    .map(|object| (format!("{} - tile {}", object.label, object.tile), id))
            })
            .collect();
        world_objects.sort();

        if !pawns.is_empty() {
            self.rows
                .push((Row::Section(format!("Pawns ({})", pawns.len())), String::new()));
            for (label, id) in pawns {
                self.rows.push((Row::Pawn(id), label));
            }
        }
        if !things.is_empty() {
            self.rows.push((
                Row::Section(format!("Things ({})", things.len())),
                String::new(),
            ));
            for (label, id) in things {
                self.rows.push((Row::Thing(id), label));
            }
        }
        if !world_objects.is_empty() {
            self.rows.push((
                Row::Section(format!("World locations ({})", world_objects.len())),
                String::new(),
            ));
            for (label, id) in world_objects {
                self.rows.push((Row::WorldObject(id), label));
            }
        }

        self.selected = self.rows.iter().position(|(row, _)| row.is_selectable());
        self.list_state = ListState::default();
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.map(|index| &self.rows[index].0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn move_selection(&mut self, forward: bool) {
        let Some(current) = self.selected else {
            return;
        };

        let next = if forward {
            self.rows
                .iter()
                .enumerate()
                .skip(current + 1)
                .find(|(_, (row, _))| row.is_selectable())
        } else {
            self.rows
                .iter()
                .enumerate()
                .take(current)
                .rev()
                .find(|(_, (row, _))| row.is_selectable())
        };

        if let Some((index, _)) = next {
            self.selected = Some(index);
        }
    }

    fn move_to_edge(&mut self, end: bool) {
        let position = if end {
            self.rows.iter().rposition(|(row, _)| row.is_selectable())
        } else {
            self.rows.iter().position(|(row, _)| row.is_selectable())
        };
        if position.is_some() {
            self.selected = position;
        }
    }
}

impl Component for ResultList {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        if self.rows.is_empty() {
            let empty = List::new([ListItem::new("No results")])
                .block(Block::default().title("Results").borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|(row, label)| match row {
                Row::Section(title) => ListItem::new(Line::from(Span::styled(
                    title.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))),
                _ => ListItem::new(Line::from(format!("  {label}"))),
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Results").borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray));

        self.list_state.select(self.selected);
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up => {
                self.move_selection(false);
                None
            }
            KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Home => {
                self.move_to_edge(false);
                None
            }
            KeyCode::End => {
                self.move_to_edge(true);
                None
            }
            KeyCode::Enter => self.selected_row().map(|_| Message::JumpToSelected),
            _ => None,
        }
    }
}
