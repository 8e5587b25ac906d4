// src/gui.rs
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use crate::config::AppConfig;
use crate::engine;
use crate::protocol::{Sample, StreamStats};
use crate::types::{ConnectionMode, GuiCommand, StreamMessage};
use crate::waveform::{Channel, RateEstimator, WindowedChannelBuffer};
const MAX_MESSAGES_PER_FRAME: usize = 200;
const LOG_LINES: usize = 8;
/// Seconds since connect as `hh:mm:ss`.
fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}
fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::AccelX => Color32::from_rgb(0, 0, 255),
        Channel::AccelY => Color32::from_rgb(255, 0, 0),
        Channel::AccelZ => Color32::from_rgb(0, 128, 0),
        Channel::AccelMagnitude => Color32::from_rgb(0, 255, 0),
        Channel::Displacement => Color32::from_rgb(0, 255, 255),
        Channel::Velocity => Color32::from_rgb(0, 0, 128),
        Channel::EventMarkerA => Color32::from_rgba_unmultiplied(147, 175, 250, 100),
        Channel::EventMarkerB => Color32::from_rgba_unmultiplied(147, 250, 194, 100),
    }
}
pub struct TapScopeApp {
    is_connected: bool,
    paused: bool,
    show_raw: bool,
    reset_view: bool,
    connection_mode: ConnectionMode,
    buffer: WindowedChannelBuffer,
    rate: RateEstimator,
    stats: StreamStats,
    raw_lines: VecDeque<String>,
    raw_log_lines: usize,
    log_messages: Vec<String>,
    rx: Receiver<StreamMessage>,
    tx_cmd: Sender<GuiCommand>,
}
impl TapScopeApp {
    pub fn new(config: AppConfig) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        let buffer = WindowedChannelBuffer::new(config.window);
        let connection_mode = config.connection.mode;
        let raw_log_lines = config.raw_log_lines;
        // The engine thread stops on its own once `tx_cmd` is dropped.
        engine::spawn_thread(tx, rx_cmd, config);
        Self {
            is_connected: false,
            paused: false,
            show_raw: false,
            reset_view: false,
            connection_mode,
            buffer,
            rate: RateEstimator::new(),
            stats: StreamStats::default(),
            raw_lines: VecDeque::with_capacity(raw_log_lines),
            raw_log_lines,
            log_messages: vec!["TapScope ready.".to_owned()],
            rx,
            tx_cmd,
        }
    }
    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > LOG_LINES {
            self.log_messages.remove(0);
        }
    }
    fn accept(&mut self, samples: &[Sample]) {
        if self.paused {
            return;
        }
        for sample in samples {
            self.rate.record(sample.event, sample.time);
        }
        self.buffer.ingest_arrival(samples);
        if let Some(last) = samples.last() {
            if self.raw_lines.len() == self.raw_log_lines {
                self.raw_lines.pop_front();
            }
            if self.raw_log_lines > 0 {
                self.raw_lines.push_back(format!(
                    "x: {:.4} y: {:.4} z: {:.4}",
                    last.accel[0], last.accel[1], last.accel[2]
                ));
            }
        }
    }
    fn drain_messages(&mut self) {
        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let Ok(msg) = self.rx.try_recv() else {
                break;
            };
            match msg {
                StreamMessage::Log(s) => self.log(&s),
                StreamMessage::Status(connected) => {
                    self.is_connected = connected;
                    if connected {
                        self.buffer.clear();
                        self.rate.reset(0.0);
                        self.raw_lines.clear();
                    }
                }
                StreamMessage::Samples(samples) => self.accept(&samples),
                StreamMessage::Stats(stats) => self.stats = stats,
            }
        }
    }
    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("TapScope");
        ui.label("Wearable motion monitor");
        ui.separator();
        ui.add_enabled_ui(!self.is_connected, |ui| {
            ui.horizontal(|ui| {
                for mode in [
                    ConnectionMode::Tcp,
                    ConnectionMode::Serial,
                    ConnectionMode::Simulation,
                ] {
                    ui.selectable_value(&mut self.connection_mode, mode, mode.label());
                }
            });
        });
        let btn_txt = if self.is_connected { "DISCONNECT" } else { "CONNECT" };
        if ui.button(btn_txt).clicked() {
            let cmd = if self.is_connected {
                GuiCommand::Disconnect
            } else {
                GuiCommand::Connect(self.connection_mode)
            };
            self.tx_cmd.send(cmd).ok();
        }
        ui.horizontal(|ui| {
            if ui.button("STOP").clicked() {
                self.paused = true;
            }
            if ui.button("RESUME").clicked() {
                self.paused = false;
            }
            if ui.button("RESET VIEW").clicked() {
                self.reset_view = true;
            }
        });
        ui.add_space(10.0);
        ui.label("WINDOW");
        let mut width = self.buffer.config().width_secs;
        if ui
            .add(egui::Slider::new(&mut width, 2.0..=30.0).text("width (s)"))
            .changed()
        {
            self.buffer.set_window_width(width);
        }
        let mut spacing = self.buffer.config().min_spacing_secs;
        if ui
            .add(
                egui::DragValue::new(&mut spacing)
                    .speed(0.001)
                    .clamp_range(0.0..=0.1)
                    .prefix("min spacing (s): "),
            )
            .changed()
        {
            self.buffer.set_min_spacing(spacing);
        }
        ui.add_space(10.0);
        ui.label("CHANNELS");
        let latest: Vec<(Channel, f64)> = self
            .buffer
            .view()
            .channels
            .iter()
            .filter_map(|view| view.latest.map(|value| (view.channel, value)))
            .collect();
        for channel in Channel::ALL {
            let mut visible = self.buffer.is_visible(channel);
            let label = match latest.iter().find(|(c, _)| *c == channel) {
                Some((_, value)) => format!("{}  {:.3}", channel.label(), value),
                None => channel.label().to_owned(),
            };
            let text = egui::RichText::new(label).color(channel_color(channel));
            if ui.checkbox(&mut visible, text).changed() {
                self.buffer.set_visible(channel, visible);
            }
        }
        ui.add_space(10.0);
        let rate = self.rate.current_rate();
        ui.label(format!("Taps/second: {}", rate.per_second));
        ui.label(format!("Taps/minute: {}", rate.per_minute_estimate));
        ui.add_space(10.0);
        ui.label(
            egui::RichText::new(format!(
                "frames {} | bad checksum {} | malformed {} | spurious {}",
                self.stats.frames_decoded,
                self.stats.checksum_mismatches,
                self.stats.malformed_frames,
                self.stats.spurious_runs
            ))
            .small(),
        );
        ui.checkbox(&mut self.show_raw, "Show raw input");
        ui.separator();
        egui::ScrollArea::vertical()
            .id_source("log")
            .max_height(100.0)
            .show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
    }
    fn plot(&mut self, ui: &mut egui::Ui) {
        let view = self.buffer.view();
        let (from, to) = view.window;
        // Dragging or zooming freezes the axes until RESET VIEW.
        let mut plot = Plot::new("motion_plot")
            .legend(Legend::default())
            .x_axis_formatter(|x, _max_chars, _range| format_clock(x))
            .include_x(from)
            .include_x(to)
            .include_y(-1.0)
            .include_y(1.0);
        if std::mem::take(&mut self.reset_view) {
            plot = plot.reset();
        }
        plot.show(ui, |plot_ui| {
            for channel in &view.channels {
                let color = channel_color(channel.channel);
                let line = Line::new(PlotPoints::new(channel.points.clone()))
                    .name(channel.channel.label())
                    .color(color);
                let line = if channel.channel.is_event_marker() {
                    line.fill(0.0_f32)
                } else {
                    line
                };
                plot_ui.line(line);
            }
        });
    }
}
impl eframe::App for TapScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();
        egui::SidePanel::left("controls")
            .min_width(220.0)
            .show(ctx, |ui| self.side_panel(ui));
        if self.show_raw {
            egui::TopBottomPanel::bottom("raw_input")
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in &self.raw_lines {
                                ui.monospace(line);
                            }
                        });
                });
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.is_connected {
                ui.label("Not connected.");
            } else if self.paused {
                ui.label(egui::RichText::new("Stopped").color(Color32::YELLOW));
            }
            self.plot(ui);
        });
        if self.is_connected {
            ctx.request_repaint();
        }
    }
}
