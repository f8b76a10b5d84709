use iced::mouse;
use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Size, Vector};

use crate::config::Config;
use crate::graph::{Graph, Node};
use crate::reducer::{self, DisplayAttrs};
use crate::state::ViewState;
use crate::{color, Message};

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 20.0;
const FIT_MARGIN: f32 = 60.0;
const MIN_LABEL_THRESHOLD: f32 = 0.0;
const MAX_LABEL_THRESHOLD: f32 = 40.0;

// Swatch bar geometry, screen space, anchored top-left.
const SWATCH_SIZE: f32 = 22.0;
const SWATCH_GAP: f32 = 8.0;
const SWATCH_MARGIN: f32 = 16.0;

// Used to fit the initial view before the first draw; matches the
// window size requested in main.
pub const DEFAULT_VIEWPORT: Size = Size::new(1024.0, 768.0);

#[derive(Debug, Clone)]
pub enum ViewMessage {
    NodeClicked { id: String },
    BackgroundClicked,
    Pan(Vector),
    Zoom { delta: f32, cursor: Point },
    ZoomReset { viewport: Size },
    ColorFilter { index: usize },
    // Search
    SearchActivate,
    SearchInput { text: String, viewport: Size },
    SearchBackspace { viewport: Size },
    SearchCommit,
    SearchClear,
    LabelThreshold { delta: f32 },
    ResetHover,
}

/// One palette bar entry: the raw color string nodes are grouped by,
/// plus its renderer color for the swatch fill.
#[derive(Debug, Clone)]
struct Swatch {
    key: String,
    fill: Color,
}

/// The canvas program: owns the graph, the view state and the camera,
/// and funnels every input event into a typed [`ViewMessage`].
pub struct GraphView {
    pub graph: Graph,
    pub state: ViewState,
    swatches: Vec<Swatch>,
    pan_offset: Vector,
    zoom: f32,
    label_threshold: f32,
    search_active: bool,
    cache: Cache,
}

impl GraphView {
    pub fn new(graph: Graph, config: &Config) -> Self {
        let swatches = graph
            .palette()
            .into_iter()
            .map(|key| {
                let fill = color::hex_to_color(&color::rgb_str_to_hex(&key));
                Swatch { key, fill }
            })
            .collect();

        let mut view = Self {
            graph,
            state: ViewState::new(),
            swatches,
            pan_offset: Vector::ZERO,
            zoom: 1.0,
            label_threshold: config.label_threshold,
            search_active: false,
            cache: Cache::new(),
        };
        view.fit_view(DEFAULT_VIEWPORT);
        view
    }

    pub fn update(&mut self, message: ViewMessage, config: &mut Config) {
        match message {
            ViewMessage::NodeClicked { id } => {
                self.state.set_hovered_node(&self.graph, Some(id));
                self.cache.clear();
            }
            ViewMessage::BackgroundClicked => {
                self.state.reset_hover();
                self.cache.clear();
            }
            ViewMessage::Pan(delta) => {
                self.pan_offset = self.pan_offset + delta;
                self.cache.clear();
            }
            ViewMessage::Zoom { delta, cursor } => {
                let old_zoom = self.zoom;
                self.zoom = (self.zoom * (1.0 + delta * 0.1)).clamp(MIN_ZOOM, MAX_ZOOM);

                // Zoom towards cursor
                let world_x = (cursor.x - self.pan_offset.x) / old_zoom;
                let world_y = (cursor.y - self.pan_offset.y) / old_zoom;
                self.pan_offset.x = cursor.x - world_x * self.zoom;
                self.pan_offset.y = cursor.y - world_y * self.zoom;
                self.cache.clear();
            }
            ViewMessage::ZoomReset { viewport } => {
                self.fit_view(viewport);
                self.cache.clear();
            }
            ViewMessage::ColorFilter { index } => {
                if let Some(key) = self.swatches.get(index).map(|s| s.key.clone()) {
                    self.state.set_color_filter(&self.graph, &key);
                    self.cache.clear();
                }
            }
            ViewMessage::SearchActivate => {
                self.search_active = true;
                self.state.set_search_query(&self.graph, "");
                self.cache.clear();
            }
            ViewMessage::SearchInput { text, viewport } => {
                self.search_active = true;
                let query = format!("{}{}", self.state.search_query, text);
                self.apply_query(&query, viewport);
            }
            ViewMessage::SearchBackspace { viewport } => {
                let mut query = self.state.search_query.clone();
                query.pop();
                self.apply_query(&query, viewport);
            }
            ViewMessage::SearchCommit => {
                // Close the bar but keep the query's filter in force.
                self.search_active = false;
                self.cache.clear();
            }
            ViewMessage::SearchClear => {
                self.search_active = false;
                self.state.set_search_query(&self.graph, "");
                self.cache.clear();
            }
            ViewMessage::LabelThreshold { delta } => {
                let threshold = (self.label_threshold + delta)
                    .clamp(MIN_LABEL_THRESHOLD, MAX_LABEL_THRESHOLD);
                self.label_threshold = threshold;
                config.set_label_threshold(threshold);
                self.cache.clear();
            }
            ViewMessage::ResetHover => {
                self.state.reset_hover();
                self.cache.clear();
            }
        }
    }

    fn apply_query(&mut self, query: &str, viewport: Size) {
        if let Some(selected) = self.state.set_search_query(&self.graph, query) {
            self.center_on(&selected, viewport);
        }
        self.cache.clear();
    }

    /// Pan so the given node sits at the viewport center.
    fn center_on(&mut self, id: &str, viewport: Size) {
        if let Some(node) = self.graph.node(id) {
            self.pan_offset = Vector::new(
                viewport.width / 2.0 - node.position.x * self.zoom,
                viewport.height / 2.0 - node.position.y * self.zoom,
            );
        }
    }

    /// Reset the camera so the whole graph fits the viewport.
    fn fit_view(&mut self, viewport: Size) {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        for node in &self.graph.nodes {
            min.x = min.x.min(node.position.x);
            min.y = min.y.min(node.position.y);
            max.x = max.x.max(node.position.x);
            max.y = max.y.max(node.position.y);
        }

        if self.graph.nodes.is_empty() {
            self.zoom = 1.0;
            self.pan_offset = Vector::ZERO;
            return;
        }

        let width = (max.x - min.x).max(1.0) + FIT_MARGIN * 2.0;
        let height = (max.y - min.y).max(1.0) + FIT_MARGIN * 2.0;
        self.zoom = (viewport.width / width)
            .min(viewport.height / height)
            .clamp(MIN_ZOOM, MAX_ZOOM);

        let center_x = (min.x + max.x) / 2.0;
        let center_y = (min.y + max.y) / 2.0;
        self.pan_offset = Vector::new(
            viewport.width / 2.0 - center_x * self.zoom,
            viewport.height / 2.0 - center_y * self.zoom,
        );
    }

    fn screen_to_world(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.pan_offset.x) / self.zoom,
            (point.y - self.pan_offset.y) / self.zoom,
        )
    }

    fn node_base(node: &Node) -> DisplayAttrs {
        DisplayAttrs {
            color: node.color,
            size: node.size,
            label: Some(node.label.clone()),
            hidden: false,
            highlighted: false,
        }
    }

    fn edge_base() -> DisplayAttrs {
        DisplayAttrs {
            color: palette::EDGE,
            size: 1.0,
            label: None,
            hidden: false,
            highlighted: false,
        }
    }

    fn swatch_rect(&self, index: usize) -> Rectangle {
        Rectangle::new(
            Point::new(
                SWATCH_MARGIN + index as f32 * (SWATCH_SIZE + SWATCH_GAP),
                SWATCH_MARGIN,
            ),
            Size::new(SWATCH_SIZE, SWATCH_SIZE),
        )
    }

    fn swatch_at(&self, point: Point) -> Option<usize> {
        (0..self.swatches.len()).find(|&i| self.swatch_rect(i).contains(point))
    }

    /// Topmost visible node under a screen point. Hidden nodes are not
    /// clickable, so this runs the same reducer the draw pass uses.
    fn node_at(&self, screen: Point) -> Option<&Node> {
        let world = self.screen_to_world(screen);
        self.graph.nodes.iter().rev().find(|node| {
            let attrs = reducer::node_reducer(&node.id, &Self::node_base(node), &self.state);
            if attrs.hidden {
                return false;
            }
            let dx = world.x - node.position.x;
            let dy = world.y - node.position.y;
            let radius = attrs.size.max(6.0 / self.zoom);
            dx * dx + dy * dy <= radius * radius
        })
    }

    fn match_count(&self) -> usize {
        if self.state.selected_node.is_some() {
            1
        } else {
            self.state.suggestions.as_ref().map_or(0, |s| s.len())
        }
    }
}

impl canvas::Program<Message> for GraphView {
    type State = Interaction;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let content = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette::BACKGROUND);

            if self.graph.nodes.is_empty() {
                let hint = Text {
                    content: "No graph loaded — pass a graph JSON file on the command line"
                        .to_string(),
                    position: Point::new(bounds.width / 2.0 - 190.0, bounds.height / 2.0),
                    color: palette::TEXT_SECONDARY,
                    size: iced::Pixels(13.0),
                    ..Text::default()
                };
                frame.fill_text(hint);
                return;
            }

            frame.translate(self.pan_offset);
            frame.scale(self.zoom);

            let edge_base = Self::edge_base();
            for edge in &self.graph.edges {
                let attrs =
                    reducer::edge_reducer(&edge.source, &edge.target, &edge_base, &self.state);
                if attrs.hidden {
                    continue;
                }
                let (Some(source), Some(target)) =
                    (self.graph.node(&edge.source), self.graph.node(&edge.target))
                else {
                    continue;
                };
                frame.stroke(
                    &Path::line(source.position, target.position),
                    Stroke::default()
                        .with_color(attrs.color)
                        .with_width(attrs.size),
                );
            }

            for node in &self.graph.nodes {
                let attrs = reducer::node_reducer(&node.id, &Self::node_base(node), &self.state);
                if attrs.hidden {
                    continue;
                }

                if attrs.highlighted {
                    let ring = Path::circle(node.position, attrs.size + 4.0 / self.zoom);
                    frame.fill(&ring, palette::HIGHLIGHT);
                }
                frame.fill(&Path::circle(node.position, attrs.size), attrs.color);

                // Highlighted nodes always get their label; everything else
                // only above the rendered-size threshold.
                let labeled =
                    attrs.highlighted || attrs.size * self.zoom >= self.label_threshold;
                if let Some(label) = attrs.label.filter(|_| labeled) {
                    let text = Text {
                        content: label,
                        position: Point::new(
                            node.position.x + attrs.size + 4.0 / self.zoom,
                            node.position.y - 7.0 / self.zoom,
                        ),
                        color: palette::TEXT_PRIMARY,
                        size: iced::Pixels(12.0 / self.zoom),
                        ..Text::default()
                    };
                    frame.fill_text(text);
                }
            }
        });

        // Color palette bar (not cached: cheap, and independent of the camera)
        let mut swatch_frame = Frame::new(renderer, bounds.size());
        for (i, swatch) in self.swatches.iter().enumerate() {
            let rect = self.swatch_rect(i);
            swatch_frame.fill_rectangle(
                Point::new(rect.x, rect.y),
                Size::new(rect.width, rect.height),
                swatch.fill,
            );
            swatch_frame.stroke(
                &Path::rectangle(
                    Point::new(rect.x, rect.y),
                    Size::new(rect.width, rect.height),
                ),
                Stroke::default()
                    .with_color(palette::SWATCH_BORDER)
                    .with_width(1.0),
            );
        }

        let search_geo = if self.search_active {
            let mut frame = Frame::new(renderer, bounds.size());
            draw_search_bar(
                &mut frame,
                bounds.size(),
                &self.state.search_query,
                self.match_count(),
            );
            frame.into_geometry()
        } else {
            Frame::new(renderer, bounds.size()).into_geometry()
        };

        vec![content, swatch_frame.into_geometry(), search_geo]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let cursor_position = cursor.position_in(bounds)?;
        let viewport = bounds.size();
        let view_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        match event {
            iced::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    if let Some(index) = self.swatch_at(cursor_position) {
                        return Some(canvas::Action::publish(Message::View(
                            ViewMessage::ColorFilter { index },
                        )));
                    }
                    if let Some(node) = self.node_at(cursor_position) {
                        return Some(canvas::Action::publish(Message::View(
                            ViewMessage::NodeClicked {
                                id: node.id.clone(),
                            },
                        )));
                    }
                    *state = Interaction::Panning {
                        last_pos: cursor_position,
                        moved: false,
                    };
                    Some(canvas::Action::request_redraw())
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) => {
                    let action = match *state {
                        // A press on empty space that never panned is a click.
                        Interaction::Panning { moved: false, .. } => Some(
                            canvas::Action::publish(Message::View(ViewMessage::BackgroundClicked)),
                        ),
                        _ => Some(canvas::Action::request_redraw()),
                    };
                    *state = Interaction::None;
                    action
                }
                mouse::Event::CursorMoved { .. } => match *state {
                    Interaction::Panning { last_pos, .. } => {
                        let delta = Vector::new(
                            cursor_position.x - last_pos.x,
                            cursor_position.y - last_pos.y,
                        );
                        *state = Interaction::Panning {
                            last_pos: cursor_position,
                            moved: true,
                        };
                        Some(canvas::Action::publish(Message::View(ViewMessage::Pan(
                            delta,
                        ))))
                    }
                    _ => None,
                },
                mouse::Event::WheelScrolled { delta } => {
                    let scroll = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => *y,
                        mouse::ScrollDelta::Pixels { y, .. } => *y / 100.0,
                    };
                    Some(canvas::Action::publish(Message::View(ViewMessage::Zoom {
                        delta: scroll,
                        cursor: cursor_position,
                    })))
                }
                _ => None,
            },
            iced::Event::Keyboard(iced::keyboard::Event::KeyPressed {
                key,
                modifiers,
                text,
                ..
            }) => {
                use iced::keyboard::Key;

                // When the search bar is open, typing edits the query.
                if self.search_active {
                    match key.as_ref() {
                        Key::Named(iced::keyboard::key::Named::Escape) => {
                            return Some(canvas::Action::publish(Message::View(
                                ViewMessage::SearchClear,
                            )));
                        }
                        Key::Named(iced::keyboard::key::Named::Backspace) => {
                            return Some(canvas::Action::publish(Message::View(
                                ViewMessage::SearchBackspace { viewport },
                            )));
                        }
                        Key::Named(iced::keyboard::key::Named::Enter) => {
                            return Some(canvas::Action::publish(Message::View(
                                ViewMessage::SearchCommit,
                            )));
                        }
                        _ => {
                            if let Some(txt) = text {
                                if !txt.is_empty() && !modifiers.control() && !modifiers.alt() {
                                    let input = txt.to_string();
                                    if input.chars().all(|c| !c.is_control()) {
                                        return Some(canvas::Action::publish(Message::View(
                                            ViewMessage::SearchInput {
                                                text: input,
                                                viewport,
                                            },
                                        )));
                                    }
                                }
                            }
                            return None;
                        }
                    }
                }

                match key.as_ref() {
                    Key::Character("f") | Key::Character("F") if modifiers.control() => {
                        Some(canvas::Action::publish(Message::View(
                            ViewMessage::SearchActivate,
                        )))
                    }
                    Key::Character("/") if !modifiers.control() => Some(canvas::Action::publish(
                        Message::View(ViewMessage::SearchActivate),
                    )),
                    Key::Character("+") | Key::Character("=") => {
                        Some(canvas::Action::publish(Message::View(ViewMessage::Zoom {
                            delta: 2.0,
                            cursor: view_center,
                        })))
                    }
                    Key::Character("-") => {
                        Some(canvas::Action::publish(Message::View(ViewMessage::Zoom {
                            delta: -2.0,
                            cursor: view_center,
                        })))
                    }
                    Key::Character("0") => Some(canvas::Action::publish(Message::View(
                        ViewMessage::ZoomReset { viewport },
                    ))),
                    Key::Character("[") => Some(canvas::Action::publish(Message::View(
                        ViewMessage::LabelThreshold { delta: -2.0 },
                    ))),
                    Key::Character("]") => Some(canvas::Action::publish(Message::View(
                        ViewMessage::LabelThreshold { delta: 2.0 },
                    ))),
                    Key::Named(iced::keyboard::key::Named::Escape) => Some(
                        canvas::Action::publish(Message::View(ViewMessage::ResetHover)),
                    ),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if let Some(pos) = cursor.position_in(bounds) {
            match state {
                Interaction::Panning { .. } => mouse::Interaction::Grabbing,
                Interaction::None => {
                    if self.swatch_at(pos).is_some() {
                        mouse::Interaction::Pointer
                    } else if self.node_at(pos).is_some() {
                        mouse::Interaction::Grab
                    } else {
                        mouse::Interaction::default()
                    }
                }
            }
        } else {
            mouse::Interaction::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum Interaction {
    #[default]
    None,
    Panning { last_pos: Point, moved: bool },
}

mod palette {
    use iced::Color;

    pub const BACKGROUND: Color = Color::from_rgb(0.07, 0.07, 0.09);
    pub const EDGE: Color = Color::from_rgba(0.55, 0.6, 0.7, 0.35);
    pub const HIGHLIGHT: Color = Color::from_rgb(0.95, 0.85, 0.3);
    pub const SWATCH_BORDER: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.35);

    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.92, 0.92, 0.94);
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.55, 0.55, 0.6);

    pub const BAR_BG: Color = Color::from_rgb(0.12, 0.12, 0.15);
    pub const BAR_BORDER: Color = Color::from_rgb(0.35, 0.55, 0.85);
    pub const MATCH_SOME: Color = Color::from_rgb(0.4, 0.75, 0.5);
    pub const MATCH_NONE: Color = Color::from_rgb(0.85, 0.4, 0.4);
}

fn draw_search_bar(frame: &mut Frame, size: Size, query: &str, match_count: usize) {
    let bar_width = 340.0;
    let bar_height = 38.0;
    let bar_x = (size.width - bar_width) / 2.0;
    let bar_y = 18.0;

    frame.fill_rectangle(
        Point::new(bar_x, bar_y),
        Size::new(bar_width, bar_height),
        palette::BAR_BG,
    );
    frame.stroke(
        &Path::rectangle(
            Point::new(bar_x, bar_y),
            Size::new(bar_width, bar_height),
        ),
        Stroke::default()
            .with_color(palette::BAR_BORDER)
            .with_width(1.5),
    );

    let display = if query.is_empty() {
        "Search labels...".to_string()
    } else {
        format!("{}|", query)
    };
    let text_color = if query.is_empty() {
        palette::TEXT_SECONDARY
    } else {
        palette::TEXT_PRIMARY
    };
    frame.fill_text(Text {
        content: display,
        position: Point::new(bar_x + 12.0, bar_y + 11.0),
        color: text_color,
        size: iced::Pixels(13.0),
        ..Text::default()
    });

    if !query.is_empty() {
        let count_text = if match_count == 1 {
            "1 match".to_string()
        } else {
            format!("{} matches", match_count)
        };
        frame.fill_text(Text {
            content: count_text,
            position: Point::new(bar_x + bar_width - 80.0, bar_y + 12.0),
            color: if match_count > 0 {
                palette::MATCH_SOME
            } else {
                palette::MATCH_NONE
            },
            size: iced::Pixels(11.0),
            ..Text::default()
        });
    }

    frame.fill_text(Text {
        content: "Enter to keep filter • Esc to clear".to_string(),
        position: Point::new(bar_x + (bar_width - 180.0) / 2.0, bar_y + bar_height + 8.0),
        color: Color::from_rgba(1.0, 1.0, 1.0, 0.4),
        size: iced::Pixels(10.0),
        ..Text::default()
    });
}
