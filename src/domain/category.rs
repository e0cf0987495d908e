/// Las tres categorías de residuos que entiende el modelo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GarbageCategory {
    Cardboard,
    AluminumCan,
    PetBottle,
}

impl GarbageCategory {
    pub const ALL: [GarbageCategory; 3] = [
        GarbageCategory::Cardboard,
        GarbageCategory::AluminumCan,
        GarbageCategory::PetBottle,
    ];

    /// `None` para -1 y cualquier id desconocido.
    pub fn from_class_id(class_id: i64) -> Option<Self> {
        match class_id {
            0 => Some(GarbageCategory::Cardboard),
            1 => Some(GarbageCategory::AluminumCan),
            2 => Some(GarbageCategory::PetBottle),
            _ => None,
        }
    }

    pub fn class_id(self) -> i64 {
        match self {
            GarbageCategory::Cardboard => 0,
            GarbageCategory::AluminumCan => 1,
            GarbageCategory::PetBottle => 2,
        }
    }

    /// Etiqueta que muestra el cliente.
    pub fn item_name(self) -> &'static str {
        match self {
            GarbageCategory::Cardboard => "段ボール",
            GarbageCategory::AluminumCan => "アルミ缶",
            GarbageCategory::PetBottle => "ペットボトル",
        }
    }
}
