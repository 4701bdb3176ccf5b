use serde_json::Value;
use shared::{
    domain::{Operation, ParamField},
    params::OperationParams,
    protocol::{ProcessForm, ProcessOutcome},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ProcessError, TransportError},
    transport::{ProcessTransport, SelectedFile, Submission},
    view::{FormState, ViewState, DONE_MESSAGE},
};

/// Result of a successful process command.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImages {
    pub input_url: String,
    pub output_url: String,
    pub meta: Value,
}

/// Owns the form and view state and runs the reset and process commands
/// against them.
///
/// `process` takes `&mut self` for its whole duration, so a second submission
/// cannot start while one is in flight.
pub struct FormController<T: ProcessTransport> {
    transport: T,
    form: FormState,
    view: ViewState,
}

impl<T: ProcessTransport> FormController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_operation(transport, Operation::default())
    }

    pub fn with_operation(transport: T, operation: Operation) -> Self {
        Self {
            transport,
            form: FormState {
                operation,
                ..FormState::default()
            },
            view: ViewState::new(operation),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        debug!(filename = %file.filename, size = file.bytes.len(), "file selected");
        self.form.file = Some(file);
    }

    pub fn select_operation(&mut self, operation: Operation) {
        self.form.operation = operation;
        self.view.sync_visibility(operation);
        debug!(%operation, visible = ?self.view.visible_fields, "operation changed");
    }

    pub fn set_field(&mut self, field: ParamField, value: impl Into<String>) {
        self.form.values.set(field, value);
    }

    /// Clears the chosen file and everything the last process command showed.
    pub fn reset(&mut self) {
        self.form.file = None;
        self.view.show_placeholders();
        self.view.hide_meta();
        self.view.clear_status();
        debug!("form reset");
    }

    /// Submits the current form once. The outcome is also written to the
    /// view: previews and metadata on success, the status line otherwise.
    pub async fn process(&mut self) -> Result<ProcessedImages, ProcessError> {
        self.view.clear_status();
        self.view.hide_meta();

        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(err) => return Err(self.report(err)),
        };

        let result = {
            let _busy = BusyTrigger::new(&mut self.view);
            submit(&self.transport, submission).await
        };

        match result {
            Ok(images) => {
                self.view.show_images(&images.input_url, &images.output_url);
                self.view.show_meta(&images.meta);
                self.view.set_status(DONE_MESSAGE, false);
                info!(output_url = %images.output_url, "image processed");
                Ok(images)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.transport.fetch_preview(url).await
    }

    fn prepare_submission(&self) -> Result<Submission, ProcessError> {
        let file = self.form.file.clone().ok_or(ProcessError::MissingInput)?;
        let params = OperationParams::parse(self.form.operation, &self.form.values)?;
        Ok(Submission {
            file,
            form: ProcessForm::from_params(&params),
        })
    }

    fn report(&mut self, err: ProcessError) -> ProcessError {
        if err.is_validation() {
            debug!(error = %err, "process blocked before submission");
        } else {
            warn!(error = %err, "process failed");
        }
        self.view.set_status(err.to_string(), true);
        err
    }
}

/// Keeps the trigger disabled for as long as it lives, including when the
/// process future is dropped mid-request.
struct BusyTrigger<'a> {
    view: &'a mut ViewState,
}

impl<'a> BusyTrigger<'a> {
    fn new(view: &'a mut ViewState) -> Self {
        view.begin_busy();
        Self { view }
    }
}

impl Drop for BusyTrigger<'_> {
    fn drop(&mut self) {
        self.view.end_busy();
    }
}

async fn submit<T: ProcessTransport>(
    transport: &T,
    submission: Submission,
) -> Result<ProcessedImages, ProcessError> {
    let response = transport.submit(submission).await?;
    match response.into_outcome().map_err(TransportError::from)? {
        ProcessOutcome::Processed {
            input_url,
            output_url,
            meta,
        } => Ok(ProcessedImages {
            input_url,
            output_url,
            meta,
        }),
        ProcessOutcome::Rejected { error } => Err(ProcessError::Rejected(error)),
    }
}
