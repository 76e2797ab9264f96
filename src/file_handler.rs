use crate::event::Intent;

/// Turns image files dropped on the window into `AddPicture` intents
#[derive(Debug, Default)]
pub struct FileHandler {
    processed_files: Vec<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect intents for any newly dropped image files
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> Vec<Intent> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            // A new drop gets a fresh list
            self.processed_files.clear();
            return Vec::new();
        }

        let mut intents = Vec::new();
        for file in &dropped {
            let file_name = file_name(file);
            if self.processed_files.contains(&file_name) {
                continue;
            }
            self.processed_files.push(file_name.clone());

            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {file_name}");
                continue;
            }
            if let Some(bytes) = read_bytes(file, &file_name) {
                log::info!("Adding picture {file_name} ({} bytes)", bytes.len());
                intents.push(Intent::AddPicture(bytes));
            }
        }
        intents
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    matches!(
        name.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    )
}

fn read_bytes(file: &egui::DroppedFile, file_name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::error!("Failed to read image file {file_name}: {err}");
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {file_name}");
    None
}
