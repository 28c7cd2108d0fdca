use serde::Deserialize;

// Body of POST /run-lighthouse. Fields are optional here so the handler can
// answer with the service's own validation messages instead of a serde error.
#[derive(Deserialize, Debug, Default)]
pub struct ParamsRunLighthouse {
    pub url: Option<String>,
    pub webhook: Option<String>,
    pub device: Option<String>,
}
