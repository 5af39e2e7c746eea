pub mod house;
pub mod measure;
pub mod person;
pub mod sun;
pub mod ui;
pub mod view;
