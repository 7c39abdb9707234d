mod loading;
mod schema;
