mod abandon;
mod permissions;
