//! The bundled greeting service.
//!
//! `GET /hello?message=Joe!` answers `Hello Joe!`; without a message it
//! answers `Hello world`. Messages shorter than three characters are
//! rejected with 400.

use crate::api::{controller, ControllerDef, OperationDef, OutputDef, ParamDef, RegistrationError, Schema};
use crate::server::{ControllerImpl, HandlerError, Input};

pub const SAY_HELLO: &str = "sayHello";

/// The shared definition used by both server and client.
pub fn hello_definition() -> Result<ControllerDef, RegistrationError> {
    controller("/")
        .operation(
            SAY_HELLO,
            OperationDef::get("/hello")
                .input(
                    "message",
                    ParamDef::query(Schema::string().min_length(3).optional()),
                )
                .output(OutputDef::text()),
        )
        .define()
}

async fn say_hello(input: Input) -> Result<String, HandlerError> {
    let message = input.str("message").unwrap_or("world");
    Ok(format!("Hello {message}"))
}

/// The greeting service with its handler bound.
pub fn hello_controller() -> Result<ControllerImpl, RegistrationError> {
    hello_definition()?.implement().handler(SAY_HELLO, say_hello).build()
}
