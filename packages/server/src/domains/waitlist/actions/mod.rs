mod join;

pub use join::join_waitlist;
