//! Main application for the Macanan GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use super::board_view::{BoardOverlay, BoardView};
use super::game_state::GameState;
use super::theme::*;
use crate::config::{Config, MAX_DEPTH};
use crate::rules::SURVIVAL_THRESHOLD;
use crate::{Phase, Side, TOTAL_MEN};

/// Main Macanan application
pub struct MacananApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl MacananApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            state: GameState::new(config),
            board_view: BoardView::default(),
            show_debug: true,
        }
    }

    /// Start a new game with the human on `side`
    fn new_game(&mut self, side: Side) {
        self.state.reset();
        self.state.set_player_side(side);
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (play Men)").clicked() {
                        self.new_game(Side::Men);
                        ui.close_menu();
                    }
                    if ui.button("New Game (play Tiger)").clicked() {
                        self.new_game(Side::Tiger);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo").clicked() {
                        self.state.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let settings = &self.state.settings;
                    let mode_text = match (settings.men_ai, settings.tiger_ai) {
                        (false, false) => "Hotseat".to_string(),
                        (true, true) => "AI vs AI".to_string(),
                        _ => format!("You: {}", settings.player_side.name()),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(250.0)
            .max_width(290.0)
            .frame(Frame::new().fill(PANEL_BG).inner_margin(8.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(12.0);
                    self.render_title_card(ui);
                    ui.add_space(12.0);

                    if self.state.resume_available {
                        self.render_resume_card(ui);
                        ui.add_space(10.0);
                    }

                    self.render_turn_card(ui);
                    ui.add_space(10.0);

                    self.render_timer_card(ui);
                    ui.add_space(10.0);

                    self.render_men_card(ui);
                    ui.add_space(10.0);

                    self.render_actions_card(ui);

                    if self.show_debug {
                        ui.add_space(10.0);
                        self.render_debug_card(ui);
                    }

                    if let Some(winner) = self.state.session.winner() {
                        ui.add_space(10.0);
                        self.render_game_over_card(ui, winner);
                    }

                    if let Some(msg) = self.state.message.clone() {
                        ui.add_space(10.0);
                        self.render_message_card(ui, &msg);
                    }
                });
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn card_title(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(10.0).color(TEXT_MUTED));
        ui.add_space(6.0);
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("MACANAN").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("Men versus Tiger").size(11.0).color(TEXT_MUTED));
        });
    }

    /// Offer to continue the game found on disk
    fn render_resume_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            Self::card_title(ui, "SAVED GAME");
            ui.label(RichText::new("A previous game was found.").size(12.0).color(TEXT_SECONDARY));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Resume").clicked() {
                    self.state.resume();
                }
                if ui.button("Discard").clicked() {
                    self.state.dismiss_resume();
                }
            });
        });
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let side = self.state.session.to_move();
            let (fill, outline) = match side {
                Side::Men => (MEN_PIECE, MEN_OUTLINE),
                Side::Tiger => (TIGER_PIECE, TIGER_STRIPE),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 20.0, fill);
                ui.painter().circle_stroke(rect.center(), 20.0, egui::Stroke::new(2.0, outline));

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(side.name().to_uppercase()).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.is_ai_thinking() {
                        ("AI thinking...", STATUS_WARNING)
                    } else if self.state.session.is_over() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if self.state.is_human_turn() {
                        ("Your turn", STATUS_OK)
                    } else {
                        ("AI to move", TEXT_SECONDARY)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                    ui.label(RichText::new(self.state.session.phase().to_string()).size(11.0).color(TEXT_MUTED));
                });
            });
        });
    }

    /// Render timer card
    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            Self::card_title(ui, "TIMER");

            if let Some(elapsed) = self.state.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let color = if secs < 1.0 {
                    STATUS_OK
                } else if secs < 3.0 {
                    STATUS_WARNING
                } else {
                    STATUS_CRITICAL
                };
                ui.label(RichText::new(format!("{:.2}s", secs)).size(28.0).strong().color(color));
            } else {
                let elapsed = self.state.move_timer.elapsed();
                ui.label(RichText::new(format!("{:.1}s", elapsed.as_secs_f32())).size(24.0).color(TEXT_PRIMARY));
            }

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(RichText::new(format!("Last AI: {:.3}s", ai_time.as_secs_f32())).size(10.0).color(TEXT_SECONDARY));
            }
        });
    }

    /// Men on board, in reserve and captured against the survival line
    fn render_men_card(&self, ui: &mut egui::Ui) {
        let board = self.state.session.board();
        let total = board.men_total();
        let margin = total.saturating_sub(SURVIVAL_THRESHOLD);

        Self::card_frame().show(ui, |ui| {
            Self::card_title(ui, "MEN");

            for (label, value) in [
                ("On board", board.men_on_board()),
                ("In reserve", board.men_reserve()),
                ("Captured", board.men_captured()),
            ] {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(TEXT_SECONDARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(value.to_string()).size(12.0).strong().color(TEXT_PRIMARY));
                    });
                });
            }

            ui.add_space(6.0);
            let color = if total < SURVIVAL_THRESHOLD {
                STATUS_CRITICAL
            } else if margin <= 2 {
                STATUS_WARNING
            } else {
                STATUS_OK
            };
            ui.add(
                egui::ProgressBar::new(f32::from(total) / f32::from(TOTAL_MEN))
                    .fill(color)
                    .text(format!("{total}/{TOTAL_MEN} (tiger wins below {SURVIVAL_THRESHOLD})")),
            );
        });
    }

    /// Render actions card
    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            Self::card_title(ui, "ACTIONS");

            ui.horizontal(|ui| {
                let btn_frame = Frame::new()
                    .fill(egui::Color32::from_rgb(50, 53, 58))
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(8.0);

                btn_frame.show(ui, |ui| {
                    if ui
                        .add(egui::Label::new(RichText::new("Undo").size(12.0).color(TEXT_PRIMARY)).sense(egui::Sense::click()))
                        .clicked()
                    {
                        self.state.undo();
                    }
                });

                ui.add_space(4.0);

                btn_frame.show(ui, |ui| {
                    if ui
                        .add(egui::Label::new(RichText::new("Reset").size(12.0).color(TEXT_PRIMARY)).sense(egui::Sense::click()))
                        .clicked()
                    {
                        self.state.reset();
                    }
                });
            });

            ui.add_space(8.0);

            let mut depth = self.state.settings.ai_depth;
            if ui.add(egui::Slider::new(&mut depth, 1..=MAX_DEPTH).text("AI depth")).changed() {
                self.state.set_ai_depth(depth);
            }

            let mut men_ai = self.state.settings.men_ai;
            let mut tiger_ai = self.state.settings.tiger_ai;
            let men_changed = ui.checkbox(&mut men_ai, "AI plays Men").changed();
            let tiger_changed = ui.checkbox(&mut tiger_ai, "AI plays Tiger").changed();
            if men_changed || tiger_changed {
                self.state.set_ai_players(men_ai, tiger_ai);
            }

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{}", self.state.session.history().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Render debug card
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                Self::card_title(ui, "AI DEBUG");

                if let Some(result) = &self.state.last_ai_result {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("{:?}", result.search_type)).size(11.0).strong().color(STATUS_OK));
                            ui.label(RichText::new(format!("Score: {}", result.score)).size(10.0).color(TEXT_SECONDARY));
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                                ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                            });
                        });
                    });

                    if let Some(mv) = &result.best_move {
                        ui.add_space(4.0);
                        ui.label(RichText::new(format!("-> {mv}")).size(12.0).strong().color(WIN_HIGHLIGHT));
                    }
                } else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                }
            });
    }

    /// Render game over card
    fn render_game_over_card(&mut self, ui: &mut egui::Ui, winner: Side) {
        let reason = match winner {
            Side::Tiger => format!("fewer than {SURVIVAL_THRESHOLD} men left"),
            Side::Men => "tiger trapped".to_string(),
        };
        let tiger_wins = self
            .state
            .records
            .iter()
            .filter(|r| r.winner == Side::Tiger)
            .count();
        let men_wins = self.state.records.len() - tiger_wins;

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("{} WIN", winner.name().to_uppercase()))
                            .size(20.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );
                    ui.label(RichText::new(format!("by {reason}")).size(11.0).color(TEXT_SECONDARY));
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("Session: Men {men_wins} - {tiger_wins} Tiger"))
                            .size(10.0)
                            .color(TEXT_MUTED),
                    );

                    ui.add_space(12.0);

                    Frame::new()
                        .fill(egui::Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            if ui
                                .add(
                                    egui::Label::new(RichText::new("New Game").size(14.0).strong().color(TEXT_PRIMARY))
                                        .sense(egui::Sense::click()),
                                )
                                .clicked()
                            {
                                self.state.reset();
                            }
                        });
                });
            });
    }

    /// Render status message card
    fn render_message_card(&self, ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            let highlighted = self.state.highlighted_nodes();
            let winner = match self.state.session.phase() {
                Phase::GameOver(side) => Some(side),
                _ => None,
            };
            let overlay = BoardOverlay {
                last_move: self.state.last_move.as_ref(),
                selected: self.state.session.selected(),
                highlighted: &highlighted,
                winner,
            };

            let board = *self.state.session.board();
            if let Some(node) = self.board_view.show(ui, &board, &overlay) {
                self.state.handle_click(node);
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            // D - Toggle debug panel
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }

            // U - Undo
            if i.key_pressed(egui::Key::U) {
                self.state.undo();
            }

            // N - New game
            if i.key_pressed(egui::Key::N) {
                self.state.reset();
            }
        });
    }
}

impl eframe::App for MacananApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();

        // The resume prompt waits for the player before any AI move
        if !self.state.resume_available {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep the timer ticking while a game is in progress
        if self.state.is_ai_thinking() || !self.state.session.is_over() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
