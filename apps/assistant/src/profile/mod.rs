// Profile sidebar: fetch the CV document once, derive display fields and skill pills.

pub mod display;
pub mod loader;
pub mod skills;
