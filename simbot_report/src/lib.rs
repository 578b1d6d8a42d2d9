#![warn(missing_debug_implementations, rust_2018_idioms)]
/*!
# Example
```ignore
#[tokio::main]
async fn main() -> Result<(), ReportError> {
    let form = ReportForm::new(
        TextInput::new("US"),
        TextInput::new("3"),
        TextInput::new("heroic"),
        TextInput::new("Clutch"),
        TextInput::new("Fizzcrank"),
    );
    let printout = HtmlContainer::new();
    let source = HttpReportSource::new(&SiteConfig::default())?;
    let handler = Arc::new(FormSubmitHandler::new(form, printout.clone(), source));

    let submit = TriggerControl::new();
    let bound = handler.bind(&submit);

    submit.click();
    submit.close();
    bound.await.unwrap();

    println!("{}", printout.html());
    Ok(())
}
```
*/

#[macro_use] extern crate log;

pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod source;
pub mod ui;

pub use config::{ConfigError, ResponseOrdering, SiteConfig, SiteConfigYaml};
pub use error::{ReportError, ReportResult};
pub use handler::{FormSubmitHandler, ReportForm};
pub use request::ReportRequest;
pub use source::{HttpReportSource, ReportSource};
pub use ui::{DisplayContainer, ErrorDisplay, HtmlContainer, InputField, LogErrors, TextInput, TriggerControl};
