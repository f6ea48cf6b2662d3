
mod record;
mod resource;
