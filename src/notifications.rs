//! User-facing status notifications.
//!
//! The engine never renders messages itself. It emits a [`Notice`] (a
//! stable key plus English and Korean text) through a [`NotificationSink`]
//! supplied by the hosting view, which decides how to show it.

use crate::error::CameraError;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bilingual {
    pub en: String,
    pub ko: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, ko: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ko: ko.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: &'static str,
    pub text: Bilingual,
}

impl Notice {
    pub fn new(key: &'static str, en: impl Into<String>, ko: impl Into<String>) -> Self {
        Self {
            key,
            text: Bilingual::new(en, ko),
        }
    }

    pub fn camera_error(error: &CameraError) -> Self {
        let key = error.notice_key();
        match error {
            CameraError::PermissionDenied => Self::new(
                key,
                "Camera permission was denied. Allow camera access to use gesture control.",
                "카메라 권한이 거부되었습니다. 제스처 제어를 사용하려면 카메라 접근을 허용하세요.",
            ),
            CameraError::NoDevice => Self::new(
                key,
                "No camera was found.",
                "카메라를 찾을 수 없습니다.",
            ),
            CameraError::DeviceBusy => Self::new(
                key,
                "The camera is in use by another application.",
                "다른 애플리케이션이 카메라를 사용 중입니다.",
            ),
            CameraError::InsecureContext => Self::new(
                key,
                "Camera access requires a secure connection (HTTPS or localhost).",
                "카메라를 사용하려면 보안 연결(HTTPS 또는 localhost)이 필요합니다.",
            ),
            CameraError::Unsupported => Self::new(
                key,
                "Camera access is not supported in this environment.",
                "이 환경에서는 카메라를 사용할 수 없습니다.",
            ),
            CameraError::Other(detail) => Self::new(
                key,
                format!("Could not start the camera: {detail}"),
                format!("카메라를 시작할 수 없습니다: {detail}"),
            ),
        }
    }

    pub fn gesture_starting() -> Self {
        Self::new("gesture.starting", "Starting camera...", "카메라를 시작하는 중...")
    }

    pub fn gesture_enabled() -> Self {
        Self::new("gesture.enabled", "Gesture control is on.", "제스처 제어가 켜졌습니다.")
    }

    pub fn gesture_disabled() -> Self {
        Self::new("gesture.disabled", "Gesture control is off.", "제스처 제어가 꺼졌습니다.")
    }

    pub fn calibration_started() -> Self {
        Self::new(
            "calibration.started",
            "Calibrating: hold a pinch in front of the camera.",
            "보정 중: 카메라 앞에서 엄지와 검지를 모아 유지하세요.",
        )
    }

    pub fn calibration_progress(percent: u8) -> Self {
        Self::new(
            "calibration.progress",
            format!("Calibrating... {percent}%"),
            format!("보정 중... {percent}%"),
        )
    }

    pub fn calibration_done() -> Self {
        Self::new("calibration.done", "Calibration complete.", "보정이 완료되었습니다.")
    }

    pub fn calibration_fallback() -> Self {
        Self::new(
            "calibration.fallback",
            "Calibration timed out. Using the default pinch setting.",
            "보정 시간이 초과되었습니다. 기본 설정을 사용합니다.",
        )
    }

    pub fn view_reset() -> Self {
        Self::new("gesture.view_reset", "View reset.", "화면을 초기화했습니다.")
    }
}

/// Where notices go. Implemented by the hosting view.
pub trait NotificationSink {
    fn on_info(&mut self, notice: Notice);
    fn on_error(&mut self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Sink that keeps every notice in order.
#[derive(Debug, Default)]
pub struct NoticeLog {
    entries: Vec<(NoticeLevel, Notice)>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(NoticeLevel, Notice)] {
        &self.entries
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(_, n)| n.key).collect()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.entries
            .iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, n)| n)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl NotificationSink for NoticeLog {
    fn on_info(&mut self, notice: Notice) {
        self.entries.push((NoticeLevel::Info, notice));
    }

    fn on_error(&mut self, notice: Notice) {
        self.entries.push((NoticeLevel::Error, notice));
    }
}

/// Share one sink between the engine and the host's UI code.
impl<T: NotificationSink> NotificationSink for Rc<RefCell<T>> {
    fn on_info(&mut self, notice: Notice) {
        self.borrow_mut().on_info(notice);
    }

    fn on_error(&mut self, notice: Notice) {
        self.borrow_mut().on_error(notice);
    }
}
