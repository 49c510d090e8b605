use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Shadow, Stroke, Vec2};

use crate::app::StatusKind;

pub struct EditorTheme {
    // Colors
    pub background: Color32,
    pub surface: Color32,
    pub surface_hover: Color32,
    pub surface_active: Color32,
    pub card: Color32,
    pub border: Color32,
    pub border_active: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // Spacing
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub padding_medium: f32,

    pub radius_medium: Rounding,
    pub radius_large: Rounding,

    pub shadow_small: Shadow,
    pub shadow_medium: Shadow,

    pub font_small: FontId,
    pub font_medium: FontId,
    pub font_title: FontId,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(28, 28, 30),
            surface: Color32::from_rgb(44, 44, 46),
            surface_hover: Color32::from_rgb(58, 58, 60),
            surface_active: Color32::from_rgb(72, 72, 74),
            card: Color32::from_rgb(38, 38, 40),
            border: Color32::from_rgb(70, 70, 70),
            border_active: Color32::from_rgb(100, 100, 100),
            text_primary: Color32::from_rgb(255, 255, 255),
            text_secondary: Color32::from_rgb(200, 200, 200),
            text_muted: Color32::from_rgb(140, 140, 140),
            accent: Color32::from_rgb(52, 152, 219), // upload button blue
            success: Color32::from_rgb(46, 204, 113), // save button green
            warning: Color32::from_rgb(255, 149, 0),
            error: Color32::from_rgb(255, 59, 48),

            spacing_small: 4.0,
            spacing_medium: 8.0,
            spacing_large: 12.0,
            padding_medium: 8.0,

            radius_medium: Rounding::same(8.0),
            radius_large: Rounding::same(12.0),

            shadow_small: Shadow {
                offset: Vec2::new(0.0, 1.0),
                blur: 3.0,
                spread: 0.0,
                color: Color32::from_black_alpha(25),
            },
            shadow_medium: Shadow {
                offset: Vec2::new(0.0, 2.0),
                blur: 8.0,
                spread: 0.0,
                color: Color32::from_black_alpha(40),
            },

            font_small: FontId::new(12.0, FontFamily::Proportional),
            font_medium: FontId::new(14.0, FontFamily::Proportional),
            font_title: FontId::new(18.0, FontFamily::Proportional),
        }
    }
}

impl EditorTheme {
    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card;
        style.visuals.window_shadow = self.shadow_medium;
        style.visuals.window_rounding = self.radius_large;
        style.visuals.window_stroke = Stroke::new(1.0, self.border);

        style.visuals.button_frame = true;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.inactive.bg_fill = self.surface;
        style.visuals.widgets.inactive.weak_bg_fill = self.surface;
        style.visuals.widgets.inactive.rounding = self.radius_medium;
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);

        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.hovered.bg_fill = self.surface_hover;
        style.visuals.widgets.hovered.weak_bg_fill = self.surface_hover;
        style.visuals.widgets.hovered.rounding = self.radius_medium;
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.border_active);

        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);
        style.visuals.widgets.active.bg_fill = self.surface_active;
        style.visuals.widgets.active.weak_bg_fill = self.surface_active;
        style.visuals.widgets.active.rounding = self.radius_medium;
        style.visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.border_active);

        style.visuals.selection.bg_fill = self.accent;
        style.visuals.selection.stroke = Stroke::new(1.0, self.accent);

        style.text_styles = [
            (egui::TextStyle::Heading, self.font_title.clone()),
            (egui::TextStyle::Body, self.font_medium.clone()),
            (egui::TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
            (egui::TextStyle::Button, self.font_medium.clone()),
            (egui::TextStyle::Small, self.font_small.clone()),
        ]
        .into();

        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame {
            inner_margin: egui::Margin::symmetric(self.padding_medium, self.padding_medium),
            rounding: self.radius_large,
            shadow: self.shadow_small,
            fill: self.card,
            ..Default::default()
        }
    }

    /// Filled button in `fill` with white text.
    pub fn colored_button(&self, text: &str, fill: Color32) -> egui::Button<'static> {
        egui::Button::new(
            egui::RichText::new(text.to_string())
                .size(14.0)
                .color(Color32::WHITE)
                .strong(),
        )
        .rounding(self.radius_medium)
        .fill(fill)
    }

    pub fn status_color(&self, kind: StatusKind) -> Color32 {
        match kind {
            StatusKind::Info => self.text_secondary,
            StatusKind::Success => self.success,
            StatusKind::Warning => self.warning,
            StatusKind::Error => self.error,
        }
    }

    pub fn section_title(&self, ui: &mut egui::Ui, title: &str) {
        ui.label(
            egui::RichText::new(title)
                .size(16.0)
                .strong()
                .color(self.text_primary),
        );
        ui.add_space(self.spacing_small);
    }
}
