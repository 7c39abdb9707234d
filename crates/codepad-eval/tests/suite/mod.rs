mod classify;
mod conditionals;
mod expressions;
