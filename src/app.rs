use std::path::{Path, PathBuf};

use eframe::egui;
use image::RgbImage;
use log::{error, info, warn};

use photo_editor::config::EditorConfig;
use photo_editor::operation::{
    AspectMode, BorderMethod, Operation, PadParams, ThresholdMode, ALPHA_RANGE, BRIGHTNESS_RANGE,
    CONTRAST_RANGE, MARGIN_RANGE, RATIO_TERM_RANGE,
};
use photo_editor::{image_io, transforms, Command, EditSession, EditorError};

use crate::ui_theme::EditorTheme;

const SAVE_FILE_NAME: &str = "edited.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AspectChoice {
    Square,
    Rectangle,
    Ratio,
}

/// Button presses collected during a frame, handled once drawing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Open,
    Brightness,
    Contrast,
    Grayscale,
    Pad,
    Threshold,
    Blend,
    Undo,
    ShowHistory,
    SaveAndExit,
    Quit,
}

struct Preview {
    title: String,
    texture: egui::TextureHandle,
}

pub struct EditorApp {
    session: EditSession,

    // Operation parameters
    brightness: i32,
    contrast: f32,
    pad_method: BorderMethod,
    pad_aspect: AspectChoice,
    ratio_w: u32,
    ratio_h: u32,
    pad_margin: u32,
    threshold_mode: ThresholdMode,
    blend_alpha: f64,

    // UI state
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    preview: Option<Preview>,
    status: Option<(String, StatusKind)>,
    show_history: bool,
    exit_summary: Option<String>,
    pending: Vec<UiAction>,

    config: EditorConfig,
    config_path: PathBuf,
    theme: EditorTheme,
}

impl EditorApp {
    pub fn new() -> Self {
        let config_path = EditorConfig::default_path();
        let config = EditorConfig::load_or_default(&config_path);
        let (pad_aspect, ratio_w, ratio_h) = match config.pad_aspect() {
            AspectMode::Square => (AspectChoice::Square, 4, 5),
            AspectMode::Rectangle => (AspectChoice::Rectangle, 4, 5),
            AspectMode::Ratio(a, b) => (AspectChoice::Ratio, a, b),
        };

        Self {
            session: EditSession::new(),
            brightness: 20,
            contrast: 1.5,
            pad_method: config.pad_method(),
            pad_aspect,
            ratio_w,
            ratio_h,
            pad_margin: 0,
            threshold_mode: config.threshold_mode(),
            blend_alpha: 0.5,
            texture: None,
            texture_dirty: false,
            preview: None,
            status: None,
            show_history: false,
            exit_summary: None,
            pending: Vec::new(),
            config,
            config_path,
            theme: EditorTheme::default(),
        }
    }

    fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some((message.into(), kind));
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save(&self.config_path) {
            error!("Failed to save config: {}", e);
        }
    }

    fn remember_directory(&mut self, file: &Path) {
        if self.config.remember_directory_of(file) {
            self.save_config();
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new();
        match self.config.last_directory() {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn pick_image(&mut self, title: &str) -> Option<(PathBuf, RgbImage)> {
        let path = self
            .file_dialog()
            .set_title(title)
            .add_filter("Images", &image_io::IMAGE_EXTENSIONS)
            .pick_file()?;
        self.remember_directory(&path);

        if !image_io::is_supported_image(&path) {
            warn!("Unsupported file type: {}", path.display());
            self.set_status(
                format!("❌ Unsupported file type: {}", image_io::display_name(&path)),
                StatusKind::Error,
            );
            return None;
        }

        match image_io::decode(&path) {
            Ok(image) => Some((path, image)),
            Err(e) => {
                warn!("{}", e);
                self.set_status(e.to_string(), StatusKind::Error);
                None
            }
        }
    }

    fn aspect_mode(&self) -> AspectMode {
        match self.pad_aspect {
            AspectChoice::Square => AspectMode::Square,
            AspectChoice::Rectangle => AspectMode::Rectangle,
            AspectChoice::Ratio => AspectMode::Ratio(self.ratio_w, self.ratio_h),
        }
    }

    /// Turns an action into a session command. `None` when the user cancelled a dialog
    /// or the action is handled entirely by the shell.
    fn command_for(&mut self, action: UiAction) -> Option<Command> {
        let command = match action {
            UiAction::Open => {
                let (_, image) = self.pick_image("Open image")?;
                Command::Load(image)
            }
            UiAction::Brightness => Command::Apply(Operation::Brightness {
                delta: self.brightness,
            }),
            UiAction::Contrast => Command::Apply(Operation::Contrast {
                factor: self.contrast,
            }),
            UiAction::Grayscale => Command::Apply(Operation::Grayscale),
            UiAction::Pad => {
                let params = PadParams {
                    method: self.pad_method,
                    aspect: self.aspect_mode(),
                    margin: self.pad_margin,
                };
                if self.config.remember_pad(&params) {
                    self.save_config();
                }
                Command::Apply(Operation::Pad(params))
            }
            UiAction::Threshold => {
                if self.config.remember_threshold(self.threshold_mode) {
                    self.save_config();
                }
                Command::Apply(Operation::Threshold {
                    mode: self.threshold_mode,
                })
            }
            UiAction::Blend => {
                if !self.session.is_loaded() {
                    self.set_status(EditorError::NoImageLoaded.to_string(), StatusKind::Warning);
                    return None;
                }
                let (path, second) = self.pick_image("Choose second image")?;
                Command::Apply(Operation::Blend {
                    second,
                    source_name: image_io::display_name(&path),
                    alpha: self.blend_alpha,
                })
            }
            UiAction::Undo => Command::Undo,
            UiAction::ShowHistory | UiAction::SaveAndExit | UiAction::Quit => return None,
        };
        Some(command)
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::ShowHistory => self.show_history = true,
            UiAction::SaveAndExit => self.save_and_exit(ctx),
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            _ => {
                if let Some(command) = self.command_for(action) {
                    self.run(ctx, command);
                }
            }
        }
    }

    fn run(&mut self, ctx: &egui::Context, command: Command) {
        let preview_title = match &command {
            Command::Apply(operation) if self.config.show_preview => {
                Some(format!("{} preview", capitalize(operation.kind())))
            }
            _ => None,
        };
        let before = match preview_title {
            Some(_) => self.session.current().cloned(),
            None => None,
        };

        let outcome = self.session.dispatch(command).map(|_| ());
        match outcome {
            Ok(()) => {
                self.texture_dirty = true;
                let message = match self.session.log_entries().last() {
                    Some(entry) => format!("✅ {}", entry.description),
                    None => "✅ Image loaded".to_string(),
                };
                self.set_status(message, StatusKind::Success);
            }
            Err(EditorError::NothingToUndo) => {
                self.set_status("Nothing to undo.", StatusKind::Info);
                return;
            }
            Err(e) => {
                warn!("{}", e);
                self.set_status(format!("❌ {}", e), StatusKind::Error);
                return;
            }
        }

        if let (Some(title), Some(before), Some(after)) =
            (preview_title, before, self.session.current())
        {
            let combined = transforms::side_by_side(&before, after, self.config.preview_size);
            self.preview = Some(Preview {
                title,
                texture: ctx.load_texture("preview", to_color_image(&combined), Default::default()),
            });
        }
    }

    fn save_and_exit(&mut self, ctx: &egui::Context) {
        let Some(current) = self.session.current() else {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        };

        let picked = self
            .file_dialog()
            .set_file_name(SAVE_FILE_NAME)
            .add_filter("JPEG", &["jpg"])
            .save_file();

        let Some(path) = picked else {
            info!("Save cancelled, closing");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        };

        match image_io::encode(current, &path) {
            Ok(written) => {
                self.remember_directory(&written);
                self.set_status(format!("💾 Saved {}", written.display()), StatusKind::Success);
                self.exit_summary = Some(self.session.history_report());
            }
            Err(e) => {
                error!("{}", e);
                self.set_status(format!("❌ {}", e), StatusKind::Error);
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        self.texture_dirty = false;
        self.texture = self.session.current().map(|image| {
            let size = self.config.display_size;
            let display = transforms::resize_to(image, size, size);
            ctx.load_texture("current-image", to_color_image(&display), Default::default())
        });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z)) {
            self.pending.push(UiAction::Undo);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));
        egui::SidePanel::left("operations")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("operations_scroll")
                    .show(ui, |ui| self.show_operations(ui));
            });
        egui::CentralPanel::default().show(ctx, |ui| self.show_canvas(ui));

        self.show_history_window(ctx);
        self.show_preview_window(ctx);
        self.show_exit_summary(ctx);

        let actions: Vec<UiAction> = self.pending.drain(..).collect();
        for action in actions {
            self.handle_action(ctx, action);
        }
        self.refresh_texture(ctx);
    }
}

impl EditorApp {
    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(self.theme.spacing_medium);
        ui.horizontal(|ui| {
            if ui
                .add_sized(
                    [140.0, 32.0],
                    self.theme.colored_button("Upload Image", self.theme.accent),
                )
                .clicked()
            {
                self.pending.push(UiAction::Open);
            }

            ui.add_space(self.theme.spacing_large);

            if let Some((message, kind)) = &self.status {
                ui.label(
                    egui::RichText::new(message)
                        .size(13.0)
                        .color(self.theme.status_color(*kind)),
                );
            }
        });
        ui.add_space(self.theme.spacing_medium);
    }

    fn show_operations(&mut self, ui: &mut egui::Ui) {
        let loaded = self.session.is_loaded();

        self.theme.card_frame().show(ui, |ui| {
            self.theme.section_title(ui, "Adjust");

            ui.add(egui::Slider::new(&mut self.brightness, BRIGHTNESS_RANGE).text("delta"));
            if ui.add_enabled(loaded, egui::Button::new("Brightness")).clicked() {
                self.pending.push(UiAction::Brightness);
            }
            ui.add_space(self.theme.spacing_medium);

            ui.add(egui::Slider::new(&mut self.contrast, CONTRAST_RANGE).text("factor"));
            if ui.add_enabled(loaded, egui::Button::new("Contrast")).clicked() {
                self.pending.push(UiAction::Contrast);
            }
            ui.add_space(self.theme.spacing_medium);

            if ui.add_enabled(loaded, egui::Button::new("Grayscale")).clicked() {
                self.pending.push(UiAction::Grayscale);
            }
        });
        ui.add_space(self.theme.spacing_medium);

        self.theme.card_frame().show(ui, |ui| {
            self.theme.section_title(ui, "Padding");

            egui::ComboBox::from_label("Fill")
                .selected_text(self.pad_method.name())
                .show_ui(ui, |ui| {
                    for method in BorderMethod::ALL {
                        ui.selectable_value(&mut self.pad_method, method, method.name());
                    }
                });

            ui.horizontal(|ui| {
                ui.radio_value(&mut self.pad_aspect, AspectChoice::Square, "square");
                ui.radio_value(&mut self.pad_aspect, AspectChoice::Rectangle, "rectangle");
                ui.radio_value(&mut self.pad_aspect, AspectChoice::Ratio, "ratio");
            });
            if self.pad_aspect == AspectChoice::Ratio {
                ui.add(egui::Slider::new(&mut self.ratio_w, RATIO_TERM_RANGE).text("width"));
                ui.add(egui::Slider::new(&mut self.ratio_h, RATIO_TERM_RANGE).text("height"));
            }

            ui.add(egui::Slider::new(&mut self.pad_margin, MARGIN_RANGE).text("px"));
            if ui.add_enabled(loaded, egui::Button::new("Padding")).clicked() {
                self.pending.push(UiAction::Pad);
            }
        });
        ui.add_space(self.theme.spacing_medium);

        self.theme.card_frame().show(ui, |ui| {
            self.theme.section_title(ui, "Threshold");
            ui.horizontal(|ui| {
                ui.radio_value(&mut self.threshold_mode, ThresholdMode::Binary, "binary");
                ui.radio_value(&mut self.threshold_mode, ThresholdMode::Inverse, "inverse");
            });
            if ui.add_enabled(loaded, egui::Button::new("Threshold")).clicked() {
                self.pending.push(UiAction::Threshold);
            }
        });
        ui.add_space(self.theme.spacing_medium);

        self.theme.card_frame().show(ui, |ui| {
            self.theme.section_title(ui, "Blend");
            ui.add(egui::Slider::new(&mut self.blend_alpha, ALPHA_RANGE).text("alpha"));
            if ui.add_enabled(loaded, egui::Button::new("Blend Image...")).clicked() {
                self.pending.push(UiAction::Blend);
            }
        });
        ui.add_space(self.theme.spacing_medium);

        self.theme.card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.session.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.pending.push(UiAction::Undo);
                }
                if ui.button("History").clicked() {
                    self.pending.push(UiAction::ShowHistory);
                }
            });
            if ui
                .checkbox(&mut self.config.show_preview, "Show before/after preview")
                .changed()
            {
                self.save_config();
            }
        });
        ui.add_space(self.theme.spacing_large);

        if ui
            .add_sized(
                [ui.available_width(), 36.0],
                self.theme.colored_button("Save & Exit", self.theme.success),
            )
            .clicked()
        {
            self.pending.push(UiAction::SaveAndExit);
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                ui.centered_and_justified(|ui| {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::new(
                            texture.id(),
                            texture.size_vec2(),
                        ))
                        .shrink_to_fit(),
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("No image loaded")
                            .size(16.0)
                            .color(self.theme.text_muted),
                    );
                });
            }
        }
    }

    fn show_history_window(&mut self, ctx: &egui::Context) {
        if !self.show_history {
            return;
        }
        let mut open = true;
        egui::Window::new("Operation History")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .show(ctx, |ui| self.show_log_lines(ui));
        self.show_history = open;
    }

    fn show_log_lines(&self, ui: &mut egui::Ui) {
        if self.session.log_len() == 0 {
            ui.label(egui::RichText::new("No operations yet.").color(self.theme.text_muted));
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("history_scroll")
            .max_height(320.0)
            .show(ui, |ui| {
                for ((index, description), entry) in self
                    .session
                    .describe_history()
                    .zip(self.session.log_entries())
                {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{:>3}.", index))
                                .size(12.0)
                                .color(self.theme.text_muted),
                        );
                        ui.label(
                            egui::RichText::new(description)
                                .size(13.0)
                                .color(self.theme.text_secondary),
                        );
                        ui.label(
                            egui::RichText::new(
                                entry.recorded_at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
                            )
                            .size(11.0)
                            .color(self.theme.text_muted),
                        );
                    });
                }
            });
    }

    fn show_preview_window(&mut self, ctx: &egui::Context) {
        let Some(preview) = &self.preview else {
            return;
        };
        let mut open = true;
        egui::Window::new(preview.title.clone())
            .id(egui::Id::new("preview_window"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.image(egui::load::SizedTexture::new(
                    preview.texture.id(),
                    preview.texture.size_vec2(),
                ));
                ui.label(
                    egui::RichText::new("Left: Original | Right: Modified")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            });
        if !open {
            self.preview = None;
        }
    }

    fn show_exit_summary(&mut self, ctx: &egui::Context) {
        let Some(summary) = &self.exit_summary else {
            return;
        };
        let mut quit = false;
        egui::Window::new("Operation History")
            .id(egui::Id::new("exit_summary"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(summary.as_str()).monospace());
                ui.add_space(self.theme.spacing_medium);
                quit = ui.button("Close").clicked();
            });
        if quit {
            self.pending.push(UiAction::Quit);
        }
    }
}

fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let (width, height) = image.dimensions();
    egui::ColorImage::from_rgb([width as usize, height as usize], image.as_raw())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
