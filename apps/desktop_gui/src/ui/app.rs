use std::time::Duration;

use client_core::{
    Completion, LookupController, LookupError, LookupState, RenderedOrder, ViewField,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xd3, 0x2f, 0x2f);

pub struct OrderLookupApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: LookupController,
    order_id_input: String,
    status: String,
}

impl OrderLookupApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        controller: LookupController,
        status: String,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller,
            order_id_input: String::new(),
            status,
        }
    }

    pub fn state(&self) -> &LookupState {
        self.controller.state()
    }

    /// Starts a lookup for the current input. A command that cannot be queued
    /// fails the lookup immediately instead of leaving it loading.
    pub fn submit_lookup(&mut self) {
        let Some(pending) = self.controller.begin(&self.order_id_input) else {
            return;
        };
        let ticket = pending.ticket;
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchOrder {
                ticket,
                query: pending.query,
            },
            &mut self.status,
        );
        if !queued {
            self.controller
                .complete(ticket, Err(LookupError::Transport(self.status.clone())));
        }
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::LookupFinished { ticket, outcome } => {
                    if self.controller.complete(ticket, outcome) == Completion::Discarded {
                        tracing::debug!(seq = ticket.seq(), "stale lookup ignored by ui");
                    }
                }
                UiEvent::BackendFailed(message) => {
                    tracing::error!(%message, "backend worker failed");
                    self.status = message;
                }
            }
        }
    }

    fn show_search_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Order ID").strong());
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.order_id_input)
                        .hint_text("Enter order UID")
                        .desired_width(320.0),
                );
                let search_clicked = ui.button("Search").clicked();
                let enter_pressed =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if search_clicked || enter_pressed {
                    self.submit_lookup();
                }
            });
            if !self.status.is_empty() {
                ui.small(self.status.as_str());
            }
            ui.add_space(4.0);
        });
    }

    fn show_lookup_state(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.state() {
            LookupState::Idle => {
                ui.weak("Enter an order ID to look it up.");
            }
            LookupState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            LookupState::Error(message) => {
                ui.colored_label(ERROR_COLOR, message.as_str());
            }
            LookupState::Result(rendered) => show_result(ui, rendered),
        });
    }
}

fn show_fields(ui: &mut egui::Ui, fields: &[ViewField]) {
    for field in fields {
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new(format!("{}:", field.label)).strong());
            ui.label(field.value.as_str());
        });
    }
}

fn show_result(ui: &mut egui::Ui, rendered: &RenderedOrder) {
    ui.columns(2, |columns| {
        egui::ScrollArea::vertical()
            .id_salt("order_details")
            .show(&mut columns[0], |ui| {
                for section in &rendered.view.sections {
                    ui.heading(section.title.as_str());
                    show_fields(ui, &section.fields);
                    for entry in &section.entries {
                        ui.group(|ui| show_fields(ui, entry));
                    }
                    ui.add_space(10.0);
                }
            });

        egui::ScrollArea::vertical()
            .id_salt("order_json")
            .show(&mut columns[1], |ui| {
                let mut raw = rendered.raw.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut raw)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
    });
}

impl eframe::App for OrderLookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_search_bar(ctx);
        self.show_lookup_state(ctx);

        if self.controller.state().is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
