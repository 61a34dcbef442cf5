//! Collision Layers Constants
//!
//! Centralised битовые маски для raycast/overlap запросов.
//!
//! ## Архитектура:
//! - **Layer:** на каком слое находится collider (ровно один бит)
//! - **Mask:** какие слои запрос учитывает (`layer & mask != 0`)
//!
//! ## Layers:
//! - `LAYER_DEFAULT` (1): стены, препятствия, прочая статика
//! - `LAYER_IGNORE_RAYCAST` (2): триггеры, декор — raycast их не видит
//! - `LAYER_PLAYER` (4): игрок
//! - `LAYER_ENEMY` (8): враги
//! - `LAYER_GROUND` (16): поверхности, на которых можно стоять

/// Layer 1: статическая геометрия (walls, obstacles)
pub const LAYER_DEFAULT: u32 = 0b1;

/// Layer 2: объекты, невидимые для raycast
pub const LAYER_IGNORE_RAYCAST: u32 = 0b10;

/// Layer 3: player actor
pub const LAYER_PLAYER: u32 = 0b100;

/// Layer 4: enemy actors
pub const LAYER_ENEMY: u32 = 0b1000;

/// Layer 5: walkable ground
pub const LAYER_GROUND: u32 = 0b1_0000;

/// Mask: всё
pub const MASK_ALL: u32 = u32::MAX;

/// Mask: обычный raycast (всё кроме Ignore Raycast)
pub const MASK_RAYCAST_DEFAULT: u32 = MASK_ALL & !LAYER_IGNORE_RAYCAST;

/// Mask: ground check sphere под ногами
pub const MASK_GROUND_CHECK: u32 = LAYER_GROUND;

/// Mask: геометрия, которая блокирует движение актора
pub const MASK_STATIC: u32 = LAYER_DEFAULT | LAYER_GROUND;

/// Mask: всё, во что упирается character controller (статика + акторы)
pub const MASK_MOVEMENT: u32 = MASK_STATIC | LAYER_PLAYER | LAYER_ENEMY;

/// Mask: LOS врага (враги и Ignore Raycast не блокируют взгляд)
pub const MASK_ENEMY_LOS: u32 = MASK_ALL & !(LAYER_ENEMY | LAYER_IGNORE_RAYCAST);

/// Mask: проверка "путь к игроку свободен" перед прыжком (акторы не считаются препятствием)
pub const MASK_JUMP_PATH: u32 = MASK_ALL & !(LAYER_PLAYER | LAYER_ENEMY);

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_DEFAULT => "Default",
        LAYER_IGNORE_RAYCAST => "Ignore Raycast",
        LAYER_PLAYER => "Player",
        LAYER_ENEMY => "Enemy",
        LAYER_GROUND => "Ground",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_in_mask(layer: u32, mask: u32) -> bool {
        layer & mask != 0
    }

    #[test]
    fn test_enemy_los_mask_sees_player_and_walls() {
        assert!(layer_in_mask(LAYER_PLAYER, MASK_ENEMY_LOS));
        assert!(layer_in_mask(LAYER_DEFAULT, MASK_ENEMY_LOS));
        assert!(layer_in_mask(LAYER_GROUND, MASK_ENEMY_LOS));
        assert!(!layer_in_mask(LAYER_ENEMY, MASK_ENEMY_LOS));
        assert!(!layer_in_mask(LAYER_IGNORE_RAYCAST, MASK_ENEMY_LOS));
    }

    #[test]
    fn test_jump_path_mask_skips_actors() {
        assert!(!layer_in_mask(LAYER_PLAYER, MASK_JUMP_PATH));
        assert!(!layer_in_mask(LAYER_ENEMY, MASK_JUMP_PATH));
        assert!(layer_in_mask(LAYER_DEFAULT, MASK_JUMP_PATH));
    }

    #[test]
    fn test_movement_mask_blocks_on_actors_not_triggers() {
        assert!(layer_in_mask(LAYER_PLAYER, MASK_MOVEMENT));
        assert!(layer_in_mask(LAYER_ENEMY, MASK_MOVEMENT));
        assert!(layer_in_mask(LAYER_GROUND, MASK_MOVEMENT));
        assert!(!layer_in_mask(LAYER_IGNORE_RAYCAST, MASK_MOVEMENT));
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(get_layer_name(LAYER_GROUND), "Ground");
        assert_eq!(get_layer_name(0b1100), "Unknown");
    }
}
