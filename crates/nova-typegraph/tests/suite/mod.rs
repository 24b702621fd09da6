mod navigation;
mod parameters;
