use crate::geometry::Aabb;

/// A projectile and the asteroid it destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<K> {
    pub projectile: K,
    pub asteroid: K,
}

/// Match projectiles against asteroids.
///
/// Brute-force pairwise tests; entity counts stay small enough that no
/// broad phase is needed.
///
/// Projectiles are visited in order and each one takes the first live
/// asteroid it overlaps, so a projectile destroys at most one asteroid and an
/// asteroid is destroyed by at most one projectile.
pub fn projectile_hits<K: Copy>(projectiles: &[(K, Aabb)], asteroids: &[(K, Aabb)]) -> Vec<Hit<K>> {
    let mut destroyed = vec![false; asteroids.len()];
    let mut hits = Vec::new();

    for &(projectile, bolt) in projectiles {
        let target = asteroids
            .iter()
            .enumerate()
            .find(|(i, (_, rock))| !destroyed[*i] && bolt.intersects(rock));

        if let Some((i, &(asteroid, _))) = target {
            destroyed[i] = true;
            hits.push(Hit {
                projectile,
                asteroid,
            });
        }
    }

    hits
}

/// Whether any asteroid overlaps the player's hitbox
pub fn player_hit(hitbox: Aabb, asteroids: impl IntoIterator<Item = Aabb>) -> bool {
    asteroids.into_iter().any(|rock| hitbox.intersects(&rock))
}
