use client_core::{PendingQuery, QueryController, QueryError, ViewSurface};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Axis, SimulationParameters};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::{dispatch_simulation, request_cancel},
};
use crate::ui::tables::{show_rows_table, show_terms_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    DocumentReady,
    Submit,
    Previous,
    Next,
}

pub struct ViewerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: QueryController<ViewSurface>,
    status: String,
    last_error: Option<UiError>,
}

impl ViewerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        inputs: SimulationParameters,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: QueryController::new(ViewSurface::new(inputs)),
            status: "Starting".to_string(),
            last_error: None,
        };
        app.trigger(Trigger::DocumentReady);
        app
    }

    fn trigger(&mut self, trigger: Trigger) {
        let pending = match trigger {
            Trigger::DocumentReady => self.controller.begin_document_ready(),
            Trigger::Submit => self.controller.begin_submit(),
            Trigger::Previous => self.controller.begin_previous_page(),
            Trigger::Next => self.controller.begin_next_page(),
        };
        match pending {
            Ok(pending) => self.dispatch(pending),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn dispatch(&mut self, pending: PendingQuery) {
        let query = pending.id;
        self.status = format!("Simulating page {}", pending.page);
        if let Err(err) = dispatch_simulation(&self.cmd_tx, pending) {
            let outcome = self.controller.complete_query(query, Err(err));
            self.apply_outcome(outcome);
        }
    }

    fn cancel(&mut self) {
        let Some(query) = self.controller.pending_query() else {
            return;
        };
        self.controller.cancel_pending();
        request_cancel(&self.cmd_tx, query);
        self.status = "Simulation cancelled".to_string();
    }

    fn apply_outcome(&mut self, outcome: Result<(), QueryError>) {
        match outcome {
            Ok(()) => {
                self.last_error = None;
                self.status = format!("Showing page {}", self.controller.page());
            }
            Err(QueryError::Cancelled) => self.status = "Simulation cancelled".to_string(),
            Err(err) => {
                self.status = "Simulation failed".to_string();
                self.last_error = Some(UiError::from_query(&err));
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(error) => {
                    self.status = error.message().to_string();
                    self.last_error = Some(error);
                }
                UiEvent::SimulationSettled { query, outcome } => {
                    if self.controller.pending_query() != Some(query) {
                        tracing::debug!(query = query.0, "dropping result of a settled query");
                        continue;
                    }
                    let settled = self.controller.complete_query(query, outcome);
                    self.apply_outcome(settled);
                }
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let controls = self.controller.surface().controls.clone();
        let mut submitted = false;

        ui.horizontal(|ui| {
            for axis in Axis::ALL {
                ui.label(axis.label());
                let field = self.controller.surface_mut().inputs.get_mut(axis);
                let response = ui.add(egui::TextEdit::singleline(field).desired_width(48.0));
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submitted = controls.submit_enabled;
                }
            }
            if ui
                .add_enabled(controls.submit_enabled, egui::Button::new(controls.submit_label))
                .clicked()
            {
                submitted = true;
            }
            if self.controller.pending_query().is_some() && ui.button("Cancel").clicked() {
                self.cancel();
            }
        });

        if submitted {
            self.trigger(Trigger::Submit);
        }
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match &self.controller.surface().summary {
            Some(summary) => {
                for axis in Axis::ALL {
                    ui.label(format!("{axis}: {}", summary.axis(axis)));
                    ui.separator();
                }
                ui.strong(format!("total: {}", summary.total));
            }
            None => {
                ui.label("No combinations loaded yet");
            }
        });
    }

    fn show_pager(&mut self, ui: &mut egui::Ui) {
        let controls = self.controller.surface().controls.clone();
        let mut trigger = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(controls.prev_enabled, egui::Button::new("< Prev"))
                .clicked()
            {
                trigger = Some(Trigger::Previous);
            }
            ui.label(format!("Page {}", self.controller.surface().page_label));
            if ui
                .add_enabled(controls.next_enabled, egui::Button::new("Next >"))
                .clicked()
            {
                trigger = Some(Trigger::Next);
            }
            ui.separator();
            ui.label(&self.status);
        });
        if let Some(trigger) = trigger {
            self.trigger(trigger);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("simulation_form").show(ctx, |ui| {
            self.show_form(ui);
            self.show_summary(ui);
            if let Some(error) = &self.last_error {
                let prefix = match error.context() {
                    UiErrorContext::BackendStartup => "Startup error",
                    UiErrorContext::Simulate => "Error",
                };
                ui.colored_label(
                    egui::Color32::LIGHT_RED,
                    format!("{prefix}: {} {}", error.message(), error.guidance()),
                );
            }
        });

        egui::TopBottomPanel::bottom("pager").show(ctx, |ui| self.show_pager(ui));

        egui::SidePanel::right("terms_panel")
            .default_width(360.0)
            .show(ctx, |ui| show_terms_table(ui, &self.controller.surface().terms));

        egui::CentralPanel::default()
            .show(ctx, |ui| show_rows_table(ui, &self.controller.surface().rows));

        if self.controller.pending_query().is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
