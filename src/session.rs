use chrono::{DateTime, Utc};
use image::RgbImage;
use log::{debug, info};

use crate::error::{EditorError, Result};
use crate::operation::Operation;
use crate::transforms;

pub const UNDO_DESCRIPTION: &str = "undo";

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Requests the UI shell sends to the session.
#[derive(Debug, Clone)]
pub enum Command {
    Load(RgbImage),
    Apply(Operation),
    Undo,
}

/// Edit history of a single image.
///
/// The last history entry is the current image. History is empty until the first
/// `load` and never drops below one entry afterwards. The operation log only
/// grows; undo is recorded rather than erasing anything. Failed calls leave both
/// untouched.
///
/// Every applied operation keeps a full copy of its result, so memory grows
/// linearly with the number of edits.
#[derive(Debug, Default)]
pub struct EditSession {
    history: Vec<RgbImage>,
    log: Vec<LogEntry>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn current(&self) -> Option<&RgbImage> {
        self.history.last()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }

    /// Starts over from `image`: one history entry, empty log.
    pub fn load(&mut self, image: RgbImage) -> &RgbImage {
        info!("Loaded {}x{} image", image.width(), image.height());
        self.history.clear();
        self.log.clear();
        self.history.push(image);
        &self.history[0]
    }

    pub fn apply(&mut self, operation: &Operation) -> Result<&RgbImage> {
        let current = self.current().ok_or(EditorError::NoImageLoaded)?;
        let result = transforms::transform(current, operation)?;

        let description = operation.to_string();
        info!("Applied {}", description);
        self.history.push(result);
        self.log.push(LogEntry::new(description));
        debug!(
            "history={} log={}",
            self.history.len(),
            self.log.len()
        );
        Ok(&self.history[self.history.len() - 1])
    }

    pub fn undo(&mut self) -> Result<&RgbImage> {
        match self.history.len() {
            0 => Err(EditorError::NoImageLoaded),
            1 => Err(EditorError::NothingToUndo),
            _ => {
                self.history.pop();
                self.log.push(LogEntry::new(UNDO_DESCRIPTION));
                info!("Undo, {} history entries left", self.history.len());
                Ok(&self.history[self.history.len() - 1])
            }
        }
    }

    /// 1-indexed `(index, description)` pairs in the order they were recorded.
    pub fn describe_history(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.log
            .iter()
            .enumerate()
            .map(|(i, entry)| (i + 1, entry.description.as_str()))
    }

    pub fn history_report(&self) -> String {
        if self.log.is_empty() {
            return "No operations yet.".to_string();
        }
        self.describe_history()
            .map(|(i, description)| format!("{}. {}", i, description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn dispatch(&mut self, command: Command) -> Result<&RgbImage> {
        match command {
            Command::Load(image) => Ok(self.load(image)),
            Command::Apply(operation) => self.apply(&operation),
            Command::Undo => self.undo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{AspectMode, BorderMethod, PadParams};
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(6, 4, |x, y| Rgb([x as u8 * 30, y as u8 * 50, 90]))
    }

    fn descriptions(session: &EditSession) -> Vec<String> {
        session
            .describe_history()
            .map(|(_, d)| d.to_string())
            .collect()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = EditSession::new();
        assert!(!session.is_loaded());
        assert!(session.current().is_none());
        assert_eq!(session.history_len(), 0);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_load_resets() {
        let mut session = EditSession::new();
        session.load(sample());
        session.apply(&Operation::Grayscale).unwrap();
        assert_eq!(session.log_len(), 1);

        let fresh = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        session.load(fresh.clone());
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.describe_history().count(), 0);
        assert_eq!(session.current(), Some(&fresh));
    }

    #[test]
    fn test_apply_grows_history_and_log() {
        let mut session = EditSession::new();
        session.load(sample());

        let ops = [
            Operation::Brightness { delta: 10 },
            Operation::Contrast { factor: 1.2 },
            Operation::Threshold {
                mode: Default::default(),
            },
        ];
        for op in &ops {
            session.apply(op).unwrap();
        }
        assert_eq!(session.history_len(), ops.len() + 1);
        assert_eq!(session.log_len(), ops.len());
    }

    #[test]
    fn test_apply_before_load() {
        let mut session = EditSession::new();
        let result = session.apply(&Operation::Grayscale);
        assert!(matches!(result, Err(EditorError::NoImageLoaded)));
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.log_len(), 0);
    }

    #[test]
    fn test_undo_before_load() {
        let mut session = EditSession::new();
        assert!(matches!(session.undo(), Err(EditorError::NoImageLoaded)));
        assert_eq!(session.log_len(), 0);
    }

    #[test]
    fn test_undo_with_single_entry() {
        let mut session = EditSession::new();
        let img = sample();
        session.load(img.clone());

        assert!(matches!(session.undo(), Err(EditorError::NothingToUndo)));
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.log_len(), 0);
        assert_eq!(session.current(), Some(&img));
    }

    #[test]
    fn test_undo_restores_and_is_logged() {
        let mut session = EditSession::new();
        session.load(sample());
        session.apply(&Operation::Brightness { delta: 5 }).unwrap();
        let before = session.current().cloned().unwrap();

        session.apply(&Operation::Grayscale).unwrap();
        let restored = session.undo().unwrap().clone();

        assert_eq!(restored, before);
        assert_eq!(session.history_len(), 2);
        assert_eq!(descriptions(&session), vec!["brightness +5", "grayscale", "undo"]);
    }

    #[test]
    fn test_invalid_params_leave_state() {
        let mut session = EditSession::new();
        let img = sample();
        session.load(img.clone());

        let bad = Operation::Pad(PadParams {
            method: BorderMethod::Reflect,
            aspect: AspectMode::Ratio(3, 0),
            margin: 0,
        });
        assert!(matches!(session.apply(&bad), Err(EditorError::InvalidParams(_))));
        assert!(session
            .apply(&Operation::Contrast { factor: 9.0 })
            .is_err());

        assert_eq!(session.history_len(), 1);
        assert_eq!(session.log_len(), 0);
        assert_eq!(session.current(), Some(&img));
    }

    #[test]
    fn test_describe_history_is_restartable() {
        let mut session = EditSession::new();
        session.load(sample());
        session.apply(&Operation::Grayscale).unwrap();
        session.apply(&Operation::Brightness { delta: -3 }).unwrap();

        let first: Vec<_> = session.describe_history().collect();
        let second: Vec<_> = session.describe_history().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![(1, "grayscale"), (2, "brightness -3")]);
    }

    #[test]
    fn test_history_report() {
        let mut session = EditSession::new();
        session.load(sample());
        assert_eq!(session.history_report(), "No operations yet.");

        session.apply(&Operation::Grayscale).unwrap();
        session.undo().unwrap();
        assert_eq!(session.history_report(), "1. grayscale\n2. undo");
    }

    #[test]
    fn test_dispatch_table() {
        let mut session = EditSession::new();
        assert!(session.dispatch(Command::Undo).is_err());

        session.dispatch(Command::Load(sample())).unwrap();
        let out = session
            .dispatch(Command::Apply(Operation::Grayscale))
            .unwrap()
            .clone();
        assert_eq!(session.current(), Some(&out));

        session.dispatch(Command::Undo).unwrap();
        assert_eq!(session.current(), Some(&sample()));
        assert_eq!(session.log_len(), 2);
    }
}
