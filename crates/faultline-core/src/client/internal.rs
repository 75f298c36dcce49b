use crate::Configuration;

pub struct InternalClient {
    pub(crate) configuration: Configuration,
}

impl std::fmt::Debug for InternalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalClient")
            .field("configuration", &self.configuration)
            .finish()
    }
}
