//! User-visible strings, one catalog per locale.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Message catalog shared by the view and the orchestrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub choose_file: &'static str,
    pub uploading: &'static str,
    pub upload_succeeded: &'static str,
    pub upload_failed_prefix: &'static str,
    pub download_starting: &'static str,
    pub download_succeeded: &'static str,
    pub download_failed: &'static str,
    pub no_files: &'static str,
    pub list_failed: &'static str,
    pub download_button: &'static str,
    pub submit_idle: &'static str,
    pub submit_loading: &'static str,
    pub unexpected_error: &'static str,
    pub operation_failed: &'static str,
}

const EN: Messages = Messages {
    choose_file: "Please choose a file",
    uploading: "Uploading file...",
    upload_succeeded: "File uploaded successfully!",
    upload_failed_prefix: "Upload failed",
    download_starting: "Starting download...",
    download_succeeded: "File downloaded successfully!",
    download_failed: "File download failed",
    no_files: "No files uploaded",
    list_failed: "Failed to load the file list",
    download_button: "Download file",
    submit_idle: "Upload",
    submit_loading: "Uploading...",
    unexpected_error: "An unexpected error occurred",
    operation_failed: "An error occurred while performing the operation",
};

const RU: Messages = Messages {
    choose_file: "Пожалуйста, выберите файл",
    uploading: "Загрузка файла...",
    upload_succeeded: "Файл успешно загружен!",
    upload_failed_prefix: "Ошибка загрузки",
    download_starting: "Начинаем скачивание...",
    download_succeeded: "Файл успешно скачан!",
    download_failed: "Ошибка скачивания файла",
    no_files: "Файлы не загружены",
    list_failed: "Ошибка загрузки списка файлов",
    download_button: "Скачать файл",
    submit_idle: "Загрузить",
    submit_loading: "Загрузка...",
    unexpected_error: "Произошла непредвиденная ошибка",
    operation_failed: "Произошла ошибка при выполнении операции",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }

    pub fn upload_failed(&self, reason: impl std::fmt::Display) -> String {
        format!("{}: {reason}", self.upload_failed_prefix)
    }
}
