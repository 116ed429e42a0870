pub mod char_class;
pub mod text_edit;
pub mod validation;
