use crate::generator::Generator;

pub struct AppState {
    pub generator: Generator,
}

impl AppState {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator
        }
    }
}
