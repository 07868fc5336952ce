pub mod plant_classes;
