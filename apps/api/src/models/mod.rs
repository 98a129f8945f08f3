pub mod resume;

pub use resume::{
    ContactInfo, EducationEntry, ExperienceEntry, NormalizedResume, ProjectEntry, ResumeRow,
};
