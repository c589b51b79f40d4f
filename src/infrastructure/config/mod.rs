mod settings;

pub use settings::{
    MandrillConfig, ServerConfig, Settings, API_KEY_PARAM, FROM_EMAIL_PARAM, FROM_NAME_PARAM,
    SUBJECT_PARAM, TEMPLATE_NAME_PARAM,
};
