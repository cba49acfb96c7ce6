//! Board rendering for the Macanan GUI

use egui::{CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::graph;
use crate::rules::Move;
use crate::{Board, Cell, Node, Side, NODE_COUNT};

use super::theme::*;

/// Layout-space extent of the node coordinates
const LAYOUT_WIDTH: f32 = 700.0;
const LAYOUT_HEIGHT: f32 = 400.0;
/// Layout-space point that maps to the center of the board rect
const LAYOUT_CENTER: (f32, f32) = (350.0, 250.0);

/// What the board should draw besides the pieces
pub struct BoardOverlay<'a> {
    pub last_move: Option<&'a Move>,
    pub selected: Option<Node>,
    pub highlighted: &'a [Node],
    pub winner: Option<Side>,
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Screen pixels per layout unit
    scale: f32,
    /// Screen position of `LAYOUT_CENTER`
    center: Pos2,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            scale: 1.0,
            center: Pos2::ZERO,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked node if any
    pub fn show(&mut self, ui: &mut egui::Ui, board: &Board, overlay: &BoardOverlay<'_>) -> Option<Node> {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::click());
        self.fit(response.rect);

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_edges(&painter);
        self.draw_nodes(&painter);

        for &node in overlay.highlighted {
            painter.circle_filled(self.node_to_screen(node), self.piece_radius() * 0.6, legal_target());
        }

        self.draw_pieces(&painter, board);

        if let Some(mv) = overlay.last_move {
            self.draw_last_move_marker(&painter, mv);
        }
        if let Some(node) = overlay.selected {
            painter.circle_stroke(
                self.node_to_screen(node),
                self.piece_radius() + 3.0,
                Stroke::new(3.0, SELECTED_RING),
            );
        }
        if let Some(winner) = overlay.winner {
            self.draw_winner(&painter, board, winner);
            return None;
        }

        let hovered = response.hover_pos().and_then(|p| self.screen_to_node(p));
        if let Some(node) = hovered {
            painter.circle_stroke(
                self.node_to_screen(node),
                self.piece_radius() + 1.0,
                Stroke::new(1.5, hover_ring()),
            );
        }

        if response.clicked() {
            hovered
        } else {
            None
        }
    }

    /// Fit the node layout into `rect`, keeping the aspect ratio
    fn fit(&mut self, rect: Rect) {
        self.board_rect = rect;
        let usable = rect.shrink(BOARD_MARGIN);
        self.scale = (usable.width() / LAYOUT_WIDTH)
            .min(usable.height() / LAYOUT_HEIGHT)
            .max(0.1);
        self.center = usable.center();
    }

    fn piece_radius(&self) -> f32 {
        (PIECE_RADIUS * self.scale).clamp(PIECE_RADIUS * 0.5, PIECE_RADIUS * 1.5)
    }

    /// Draw every edge of the board graph
    fn draw_edges(&self, painter: &Painter) {
        let stroke = Stroke::new(EDGE_WIDTH, EDGE_LINE);
        for (a, b) in graph().edges() {
            painter.line_segment([self.node_to_screen(a), self.node_to_screen(b)], stroke);
        }
    }

    fn draw_nodes(&self, painter: &Painter) {
        for node in 0..NODE_COUNT {
            painter.circle_filled(self.node_to_screen(node), NODE_RADIUS, NODE_DOT);
        }
    }

    fn draw_pieces(&self, painter: &Painter, board: &Board) {
        for (node, cell) in board.cells().iter().enumerate() {
            match cell {
                Cell::Men => self.draw_man(painter, node),
                Cell::Tiger => self.draw_tiger(painter, node),
                Cell::Empty => {}
            }
        }
    }

    fn draw_man(&self, painter: &Painter, node: Node) {
        let center = self.node_to_screen(node);
        let radius = self.piece_radius();

        // Shadow
        painter.circle_filled(
            center + Vec2::new(2.0, 2.0),
            radius,
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 50),
        );
        painter.circle_filled(center, radius, MEN_PIECE);
        painter.circle_stroke(center, radius, Stroke::new(1.5, MEN_OUTLINE));
    }

    fn draw_tiger(&self, painter: &Painter, node: Node) {
        let center = self.node_to_screen(node);
        let radius = self.piece_radius() * 1.15;

        painter.circle_filled(
            center + Vec2::new(2.0, 2.0),
            radius,
            egui::Color32::from_rgba_unmultiplied(0, 0, 0, 70),
        );
        painter.circle_filled(center, radius, TIGER_PIECE);

        let stroke = Stroke::new(2.0, TIGER_STRIPE);
        for offset in [-0.45, 0.0, 0.45] {
            let x = center.x + offset * radius;
            let half = radius * 0.55;
            painter.line_segment([Pos2::new(x, center.y - half), Pos2::new(x, center.y + half)], stroke);
        }
        painter.circle_stroke(center, radius, Stroke::new(1.5, TIGER_STRIPE));
    }

    /// Mark the nodes the last move ended on
    fn draw_last_move_marker(&self, painter: &Painter, mv: &Move) {
        let nodes = match mv.target() {
            Some(target) => vec![target],
            None => mv.touched_nodes(),
        };
        for node in nodes {
            painter.circle_filled(self.node_to_screen(node), LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
        }
    }

    /// Ring the winning pieces: the tiger, or the men hemming it in
    fn draw_winner(&self, painter: &Painter, board: &Board, winner: Side) {
        let stroke = Stroke::new(3.0, WIN_HIGHLIGHT);
        let Some(tiger) = board.tiger_pos() else {
            return;
        };
        let nodes: Vec<Node> = match winner {
            Side::Tiger => vec![tiger],
            Side::Men => graph()
                .neighbors(tiger)
                .iter()
                .copied()
                .filter(|&n| board.get(n) == Cell::Men)
                .collect(),
        };
        for node in nodes {
            painter.circle_stroke(self.node_to_screen(node), self.piece_radius() + 3.0, stroke);
        }
    }

    /// Nearest node within `CLICK_RADIUS` of a screen position
    pub fn screen_to_node(&self, screen_pos: Pos2) -> Option<Node> {
        (0..NODE_COUNT)
            .map(|node| (node, self.node_to_screen(node).distance(screen_pos)))
            .filter(|&(_, dist)| dist <= CLICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
    }

    /// Convert a node to screen coordinates
    pub fn node_to_screen(&self, node: Node) -> Pos2 {
        let (x, y) = graph().position(node);
        Pos2::new(
            self.center.x + (x as f32 - LAYOUT_CENTER.0) * self.scale,
            self.center.y + (y as f32 - LAYOUT_CENTER.1) * self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> BoardView {
        let mut view = BoardView::default();
        view.fit(Rect::from_min_size(Pos2::ZERO, Vec2::new(700.0 + 2.0 * BOARD_MARGIN, 600.0)));
        view
    }

    #[test]
    fn test_layout_fits_rect() {
        let view = fitted();
        assert_eq!(view.scale, 1.0);
        // Leftmost and rightmost triangle tips sit on the margin
        assert_eq!(view.node_to_screen(28).x, BOARD_MARGIN);
        assert_eq!(view.node_to_screen(34).x, 700.0 + BOARD_MARGIN);
    }

    #[test]
    fn test_screen_to_node() {
        let view = fitted();
        for node in 0..NODE_COUNT {
            assert_eq!(view.screen_to_node(view.node_to_screen(node)), Some(node));
        }
        let near = view.node_to_screen(12) + Vec2::new(10.0, 5.0);
        assert_eq!(view.screen_to_node(near), Some(12));
        let between = view.node_to_screen(12) + Vec2::new(50.0, 50.0);
        assert_eq!(view.screen_to_node(between), None);
    }
}
