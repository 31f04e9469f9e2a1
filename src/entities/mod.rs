//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod activity_log;
pub mod application;
pub mod assignment;
pub mod batch;
pub mod card;
pub mod entry;
pub mod member;
pub mod offering;
pub mod outbox;
pub mod street;
pub mod window;
pub mod window_state;

// Re-export specific types to avoid conflicts
pub use activity_log::{Entity as ActivityLog, Model as ActivityLogModel};
pub use application::{Entity as Application, Model as ApplicationModel};
pub use assignment::{Column as AssignmentColumn, Entity as Assignment, Model as AssignmentModel};
pub use batch::{Entity as Batch, Model as BatchModel};
pub use card::{Column as CardColumn, Entity as Card, Model as CardModel};
pub use entry::{Column as EntryColumn, Entity as Entry, Model as EntryModel};
pub use member::{Entity as Member, Model as MemberModel};
pub use offering::{Entity as Offering, Model as OfferingModel};
pub use outbox::{Entity as Outbox, Model as OutboxModel};
pub use street::{Entity as Street, Model as StreetModel};
pub use window::{Entity as Window, Model as WindowModel};
pub use window_state::{Entity as WindowState, Model as WindowStateModel};
