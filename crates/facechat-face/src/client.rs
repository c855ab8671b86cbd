//! Face capture client: registration, recognition and registry upkeep.
//!
//! Both main flows capture a fresh still image, call the backend once and
//! report through a status line. They share no lock with each other, so a
//! failure in one never blocks the other and overlapping recognitions are
//! last-write-wins.

use std::sync::{Mutex, MutexGuard};

use facechat_capture::ImageSource;
use facechat_core::types::{
    DeleteNameRequest, FaceBackendResponse, RecognizeRequest, RegisterRequest, RegisteredFace,
};

use crate::backend::FaceBackend;
use crate::error::FaceError;
use crate::types::{FailureKind, RecognitionResult, RegistrationOutcome};

pub const NAME_REQUIRED_STATUS: &str = "Please enter a name before registering.";
pub const CAMERA_NOT_READY_STATUS: &str = "Camera not ready. No image captured.";
pub const REGISTRATION_SERVER_ERROR: &str = "Server error during registration.";
pub const RECOGNITION_SERVER_ERROR: &str = "Server error during recognition.";
pub const REGISTRY_SERVER_ERROR: &str = "Server error while updating the face registry.";

/// Reason used when the backend refuses without saying why.
const UNKNOWN_REASON: &str = "unknown error";

#[derive(Debug, Default)]
struct FaceState {
    name: String,
    status: String,
    recognition: Option<RecognitionResult>,
}

/// Client for the face backend, capturing through `S`.
pub struct FaceClient<B, S> {
    backend: B,
    camera: S,
    state: Mutex<FaceState>,
}

impl<B: FaceBackend, S: ImageSource> FaceClient<B, S> {
    pub fn new(backend: B, camera: S) -> Self {
        Self {
            backend,
            camera,
            state: Mutex::new(FaceState::default()),
        }
    }

    /// Contents of the name field.
    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock().name = name.into();
    }

    /// The latest status line shown to the user.
    pub fn status(&self) -> String {
        self.lock().status.clone()
    }

    /// The most recent recognition result, if any call has completed.
    pub fn last_recognition(&self) -> Option<RecognitionResult> {
        self.lock().recognition.clone()
    }

    /// Names from the most recent recognition. Empty after a failed call.
    pub fn recognized_names(&self) -> Vec<String> {
        self.lock()
            .recognition
            .as_ref()
            .map(|r| r.names().to_vec())
            .unwrap_or_default()
    }

    /// Register the face currently in front of the camera under `name`.
    pub async fn register(&self, name: &str) -> RegistrationOutcome {
        let name = name.trim();
        if name.is_empty() {
            self.set_status(NAME_REQUIRED_STATUS);
            return RegistrationOutcome::Failure {
                kind: FailureKind::Validation,
                reason: FaceError::NameRequired.to_string(),
            };
        }

        let Some(image) = self.camera.capture_image() else {
            self.set_status(CAMERA_NOT_READY_STATUS);
            return RegistrationOutcome::Failure {
                kind: FailureKind::Validation,
                reason: FaceError::CameraNotReady.to_string(),
            };
        };

        let request = RegisterRequest {
            name: name.to_string(),
            image: image.to_data_uri(),
        };

        match self.backend.register(&request).await {
            Ok(resp) if resp.is_success() => {
                tracing::info!(name, "Face registered");
                let mut state = self.lock();
                state.name.clear();
                state.status = format!("Registered face for {}", name);
                RegistrationOutcome::Success {
                    name: name.to_string(),
                }
            }
            Ok(resp) => {
                let reason = refusal_reason(resp);
                tracing::info!(name, reason = %reason, "Face registration refused");
                self.set_status(format!("Registration failed: {}", reason));
                RegistrationOutcome::Failure {
                    kind: FailureKind::Backend,
                    reason,
                }
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "Face registration failed");
                self.set_status(REGISTRATION_SERVER_ERROR);
                RegistrationOutcome::Failure {
                    kind: FailureKind::Server,
                    reason: REGISTRATION_SERVER_ERROR.to_string(),
                }
            }
        }
    }

    /// Register under whatever is in the name field.
    pub async fn register_from_field(&self) -> RegistrationOutcome {
        let name = self.name();
        self.register(&name).await
    }

    /// Recognize the faces currently in front of the camera.
    ///
    /// Every call replaces the stored result, so a failure clears names
    /// recognized by an earlier call.
    pub async fn recognize(&self) -> RecognitionResult {
        let Some(image) = self.camera.capture_image() else {
            return self.store_recognition(
                RecognitionResult::Failure {
                    kind: FailureKind::Validation,
                    reason: FaceError::CameraNotReady.to_string(),
                },
                CAMERA_NOT_READY_STATUS.to_string(),
            );
        };

        let request = RecognizeRequest {
            image: image.to_data_uri(),
        };

        match self.backend.recognize(&request).await.and_then(recognized) {
            Ok(names) => {
                tracing::info!(count = names.len(), "Faces recognized");
                let status = format!("Recognized: {}", names.join(", "));
                self.store_recognition(RecognitionResult::Success { names }, status)
            }
            Err(FaceError::Rejected(reason)) => {
                tracing::info!(reason = %reason, "Face recognition refused");
                let status = format!("Recognition failed: {}", reason);
                self.store_recognition(
                    RecognitionResult::Failure {
                        kind: FailureKind::Backend,
                        reason,
                    },
                    status,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Face recognition failed");
                self.store_recognition(
                    RecognitionResult::Failure {
                        kind: FailureKind::Server,
                        reason: RECOGNITION_SERVER_ERROR.to_string(),
                    },
                    RECOGNITION_SERVER_ERROR.to_string(),
                )
            }
        }
    }

    /// Faces currently known to the backend, in registration order.
    pub async fn list_registered(&self) -> Result<Vec<RegisteredFace>, FaceError> {
        let result = self.backend.list_registered().await.and_then(|resp| {
            if !resp.is_success() {
                return Err(FaceError::Rejected(refusal_reason(resp)));
            }
            Ok(resp
                .data
                .unwrap_or_default()
                .into_iter()
                .map(RegisteredFace::from_row)
                .collect::<Vec<_>>())
        });
        match &result {
            Ok(faces) => self.set_status(format!("{} registered face(s)", faces.len())),
            Err(e) => self.report_registry_error("Listing failed", e),
        }
        result
    }

    /// Remove one name from the backend registry.
    pub async fn delete_registered(&self, name: &str) -> Result<String, FaceError> {
        let name = name.trim();
        if name.is_empty() {
            self.set_status(NAME_REQUIRED_STATUS);
            return Err(FaceError::NameRequired);
        }
        let request = DeleteNameRequest {
            name: name.to_string(),
        };
        let result = self
            .backend
            .delete_name(&request)
            .await
            .and_then(|resp| maintenance_message(resp, || format!("Deleted entry for {}.", name)));
        self.report_maintenance(&result, "Deletion failed");
        result
    }

    /// Remove every registered face from the backend.
    pub async fn clear_registry(&self) -> Result<String, FaceError> {
        let result = self
            .backend
            .clear_registry()
            .await
            .and_then(|resp| maintenance_message(resp, || "All entries deleted.".to_string()));
        self.report_maintenance(&result, "Clearing failed");
        result
    }

    fn report_maintenance(&self, result: &Result<String, FaceError>, prefix: &str) {
        match result {
            Ok(message) => {
                tracing::info!(message = %message, "Face registry updated");
                self.set_status(message.clone());
            }
            Err(e) => self.report_registry_error(prefix, e),
        }
    }

    fn report_registry_error(&self, prefix: &str, err: &FaceError) {
        match err {
            FaceError::Rejected(reason) => self.set_status(format!("{}: {}", prefix, reason)),
            FaceError::NameRequired => self.set_status(NAME_REQUIRED_STATUS),
            other => {
                tracing::warn!(error = %other, "Face registry call failed");
                self.set_status(REGISTRY_SERVER_ERROR);
            }
        }
    }

    fn store_recognition(&self, result: RecognitionResult, status: String) -> RecognitionResult {
        let mut state = self.lock();
        state.recognition = Some(result.clone());
        state.status = status;
        result
    }

    fn set_status(&self, status: impl Into<String>) {
        self.lock().status = status.into();
    }

    fn lock(&self) -> MutexGuard<'_, FaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn refusal_reason(resp: FaceBackendResponse) -> String {
    resp.reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_REASON.to_string())
}

fn recognized(resp: FaceBackendResponse) -> Result<Vec<String>, FaceError> {
    if !resp.is_success() {
        return Err(FaceError::Rejected(refusal_reason(resp)));
    }
    resp.names.ok_or_else(|| {
        FaceError::MalformedResponse("successful recognition without names".to_string())
    })
}

fn maintenance_message(
    resp: FaceBackendResponse,
    fallback: impl FnOnce() -> String,
) -> Result<String, FaceError> {
    if !resp.is_success() {
        return Err(FaceError::Rejected(refusal_reason(resp)));
    }
    Ok(resp.message.unwrap_or_else(fallback))
}
