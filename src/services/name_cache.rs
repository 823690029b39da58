// src/services/name_cache.rs

// Atribuição cosmética de nomes de exibição aos funcionários.
// Não é um diretório de identidades: o nome é sorteado do pool e fica
// fixo para aquele employeeId enquanto o processo viver.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

pub const DEFAULT_NAME_POOL: &[&str] = &[
    "Dr. João Silva",
    "Enf. Maria Santos",
    "Dr. Pedro Costa",
    "Enf. Ana Paula",
    "Dr. Carlos Oliveira",
    "Enf. Juliana Ferreira",
    "Dra. Beatriz Almeida",
    "Enf. Rafael Souza",
    "Dra. Fernanda Lima",
    "Téc. Lucas Pereira",
];

// Identificador curto para a tabela: "F-" + 8 primeiros caracteres.
pub fn display_id(employee_id: &str) -> String {
    let short: String = employee_id.chars().take(8).collect();
    format!("F-{}", short.to_uppercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameAssignments {
    by_id: HashMap<String, String>,
}

impl NameAssignments {
    pub fn get(&self, employee_id: &str) -> Option<&str> {
        self.by_id.get(employee_id).map(String::as_str)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.by_id.values().any(|assigned| assigned == name)
    }

    fn insert(&mut self, employee_id: &str, name: String) {
        self.by_id.insert(employee_id.to_string(), name);
    }
}

/// Transição pura do cache: devolve o nome de `employee_id` e o mapa atualizado.
///
/// Um id já atribuído mantém o nome. Um id novo recebe um nome do pool ainda
/// não usado; esgotado o pool, qualquer nome do pool pode se repetir.
pub fn assign<R: Rng + ?Sized>(
    mut assignments: NameAssignments,
    pool: &[String],
    employee_id: &str,
    rng: &mut R,
) -> (String, NameAssignments) {
    if let Some(name) = assignments.get(employee_id) {
        return (name.to_string(), assignments);
    }

    let available: Vec<&String> = pool.iter().filter(|name| !assignments.is_taken(name)).collect();

    let picked = match available.choose(rng) {
        Some(name) => Some((*name).clone()),
        None => pool.choose(rng).cloned(),
    };

    let name = picked.unwrap_or_else(|| format!("Funcionário {}", display_id(employee_id)));
    assignments.insert(employee_id, name.clone());

    (name, assignments)
}

// Fixa um nome conhecido (ex.: employeeName vindo da API) se o id ainda não tem nome.
pub fn pin(
    mut assignments: NameAssignments,
    employee_id: &str,
    name: &str,
) -> (String, NameAssignments) {
    if let Some(existing) = assignments.get(employee_id) {
        return (existing.to_string(), assignments);
    }
    assignments.insert(employee_id, name.to_string());
    (name.to_string(), assignments)
}

struct ResolverState<R> {
    assignments: NameAssignments,
    rng: R,
}

// O cache vivo, dono do mapa e da fonte de aleatoriedade.
// O Mutex protege o mapa quando o enriquecimento roda em várias tasks.
pub struct NameResolver<R = StdRng> {
    pool: Vec<String>,
    state: Mutex<ResolverState<R>>,
}

impl NameResolver<StdRng> {
    pub fn from_entropy(pool: Vec<String>) -> Self {
        Self::new(pool, StdRng::from_entropy())
    }
}

impl<R: Rng> NameResolver<R> {
    pub fn new(pool: Vec<String>, rng: R) -> Self {
        Self {
            pool,
            state: Mutex::new(ResolverState {
                assignments: NameAssignments::default(),
                rng,
            }),
        }
    }

    pub fn resolve(&self, employee_id: &str) -> String {
        self.resolve_with_hint(employee_id, None)
    }

    pub fn resolve_with_hint(&self, employee_id: &str, hint: Option<&str>) -> String {
        // Um pânico em outra thread não invalida o mapa; seguimos com ele.
        let mut guard = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let state = &mut *guard;
        let current = std::mem::take(&mut state.assignments);

        let (name, updated) = match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(known) => pin(current, employee_id, known),
            None => assign(current, &self.pool, employee_id, &mut state.rng),
        };

        state.assignments = updated;
        name
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> NameAssignments {
        let guard = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.assignments.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn pool(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn seeded(names: &[&str]) -> NameResolver<StdRng> {
        NameResolver::new(pool(names), StdRng::seed_from_u64(7))
    }

    #[test]
    fn resolve_is_idempotent() {
        let resolver = seeded(DEFAULT_NAME_POOL);

        let first = resolver.resolve("emp-1");
        let second = resolver.resolve("emp-1");

        assert_eq!(first, second);
        assert_eq!(resolver.snapshot().get("emp-1"), Some(first.as_str()));
    }

    #[test]
    fn distinct_ids_get_distinct_names_while_the_pool_lasts() {
        let resolver = seeded(&["A", "B", "C"]);

        let names: HashSet<String> =
            ["x", "y", "z"].iter().map(|id| resolver.resolve(id)).collect();

        assert_eq!(names.len(), 3);
    }

    #[test]
    fn exhausted_pool_reuses_pool_names() {
        let resolver = seeded(&["A", "B"]);
        resolver.resolve("x");
        resolver.resolve("y");

        let third = resolver.resolve("z");

        assert!(third == "A" || third == "B");
        // o id antigo continua com o mesmo nome
        assert_eq!(resolver.resolve("x"), resolver.snapshot().get("x").unwrap());
    }

    #[test]
    fn empty_pool_falls_back_to_display_id() {
        let resolver = seeded(&[]);

        assert_eq!(resolver.resolve("3cfba964-545e"), "Funcionário F-3CFBA964");
    }

    #[test]
    fn hint_pins_the_name_only_for_unassigned_ids() {
        let resolver = seeded(&["A"]);

        assert_eq!(resolver.resolve_with_hint("x", Some("Dra. Helena")), "Dra. Helena");
        assert_eq!(resolver.resolve("x"), "Dra. Helena");

        let assigned = resolver.resolve("y");
        assert_eq!(resolver.resolve_with_hint("y", Some("Outro Nome")), assigned);
    }

    #[test]
    fn assign_is_a_pure_transition() {
        let mut rng = StdRng::seed_from_u64(1);
        let names = pool(&["A", "B"]);

        let (first, map) = assign(NameAssignments::default(), &names, "x", &mut rng);
        let (again, map_again) = assign(map.clone(), &names, "x", &mut rng);

        assert_eq!(first, again);
        assert_eq!(map, map_again);
    }

    #[test]
    fn display_id_is_short_and_upper_case() {
        assert_eq!(display_id("3cfba964-545e-4e68"), "F-3CFBA964");
        assert_eq!(display_id("ab"), "F-AB");
    }
}
