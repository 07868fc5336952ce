use crate::models::plant_types::PlantClass;

const fn class(id: u32, name: &'static str, is_healthy: bool) -> PlantClass {
    PlantClass { id, name, is_healthy }
}

/// Classes the remote model was trained on, in model index order.
pub static PLANT_CLASSES: [PlantClass; 38] = [
    class(0, "Apple - Apple Scab", false),
    class(1, "Apple - Black Rot", false),
    class(2, "Apple - Cedar Apple Rust", false),
    class(3, "Apple - Healthy", true),
    class(4, "Blueberry - Healthy", true),
    class(5, "Cherry - Powdery Mildew", false),
    class(6, "Cherry - Healthy", true),
    class(7, "Corn - Cercospora Leaf Spot (Gray Leaf Spot)", false),
    class(8, "Corn - Common Rust", false),
    class(9, "Corn - Northern Leaf Blight", false),
    class(10, "Corn - Healthy", true),
    class(11, "Grape - Black Rot", false),
    class(12, "Grape - Esca (Black Measles)", false),
    class(13, "Grape - Leaf Blight (Isariopsis Leaf Spot)", false),
    class(14, "Grape - Healthy", true),
    class(15, "Orange - Haunglongbing (Citrus Greening)", false),
    class(16, "Peach - Bacterial Spot", false),
    class(17, "Peach - Healthy", true),
    class(18, "Pepper - Bacterial Spot", false),
    class(19, "Pepper - Healthy", true),
    class(20, "Potato - Early Blight", false),
    class(21, "Potato - Late Blight", false),
    class(22, "Potato - Healthy", true),
    class(23, "Raspberry - Healthy", true),
    class(24, "Soybean - Healthy", true),
    class(25, "Squash - Powdery Mildew", false),
    class(26, "Strawberry - Leaf Scorch", false),
    class(27, "Strawberry - Healthy", true),
    class(28, "Tomato - Bacterial Spot", false),
    class(29, "Tomato - Early Blight", false),
    class(30, "Tomato - Late Blight", false),
    class(31, "Tomato - Leaf Mold", false),
    class(32, "Tomato - Septoria Leaf Spot", false),
    class(33, "Tomato - Spider Mites (Two-spotted Spider Mite)", false),
    class(34, "Tomato - Target Spot", false),
    class(35, "Tomato - Yellow Leaf Curl Virus", false),
    class(36, "Tomato - Mosaic Virus", false),
    class(37, "Tomato - Healthy", true),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_contiguous_from_zero() {
        for (idx, class) in PLANT_CLASSES.iter().enumerate() {
            assert_eq!(class.id as usize, idx);
        }
    }

    #[test]
    fn healthy_flag_follows_the_name() {
        for class in PLANT_CLASSES.iter() {
            assert_eq!(class.is_healthy, class.name.ends_with("- Healthy"), "{}", class.name);
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = PLANT_CLASSES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PLANT_CLASSES.len());
        assert_eq!(PLANT_CLASSES[8].name, "Corn - Common Rust");
    }
}
