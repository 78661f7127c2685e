use crate::types::DayNumber;
use serde::Serialize;

/// Static description of one day of the journey.
#[derive(Debug, Clone, Serialize)]
pub struct DayContent {
    pub day: u8,
    pub theme: &'static str,
    pub objective: &'static str,
    pub checklist: &'static [&'static str],
    pub tip: &'static str,
    pub deliverable: &'static str,
    pub principle: &'static str,
}

static DAYS: [DayContent; 7] = [
    DayContent {
        day: 1,
        theme: "Clareza de Foco",
        objective: "Definir o problema ou desafio central que você quer resolver.",
        checklist: &[
            "Bloqueie 1 hora sem interrupções",
            "Escreva o problema em uma frase clara",
            "Identifique o público-alvo afetado",
        ],
        tip: "Use a técnica dos '5 Porquês' para chegar à raiz do problema.",
        deliverable: "Um documento de uma página com: Problema, Público, Impacto Esperado.",
        principle: "STEPPS: Emocional - conecte-se com o porquê do problema.",
    },
    DayContent {
        day: 2,
        theme: "Pesquisa Rápida",
        objective: "Validar que o problema existe e é relevante para outros.",
        checklist: &[
            "Pesquise 3 fontes confiáveis sobre o tema",
            "Encontre 2 exemplos de soluções existentes",
            "Anote 3 insights principais",
        ],
        tip: "Use Google Scholar, Medium ou Reddit para pesquisa rápida e prática.",
        deliverable: "Lista de insights e referências em um arquivo de notas.",
        principle: "SUCCESs: Concreto - baseie-se em dados e exemplos reais.",
    },
    DayContent {
        day: 3,
        theme: "Solução Simples",
        objective: "Propor uma solução mínima e testável.",
        checklist: &[
            "Desenhe ou descreva sua solução em 3 passos",
            "Liste os recursos necessários",
            "Identifique o MVP (produto mínimo viável)",
        ],
        tip: "Pense no menor experimento que pode validar sua ideia.",
        deliverable: "Esboço visual ou texto descritivo da solução proposta.",
        principle: "Design: Prototipagem rápida - comece simples, itere depois.",
    },
    DayContent {
        day: 4,
        theme: "Estrutura Visual",
        objective: "Criar um wireframe, slide ou mockup básico.",
        checklist: &[
            "Use uma ferramenta simples (Canva, Figma, papel)",
            "Organize as informações de forma clara",
            "Inclua título, problema e solução",
        ],
        tip: "Não precisa ser bonito, precisa ser funcional e claro.",
        deliverable: "Wireframe ou slide inicial da sua solução.",
        principle: "SUCCESs: Visual - mostre, não apenas conte.",
    },
    DayContent {
        day: 5,
        theme: "Conteúdo Magnético",
        objective: "Escrever uma mensagem clara que explique seu projeto.",
        checklist: &[
            "Crie um título chamativo",
            "Escreva uma descrição em 3 parágrafos",
            "Adicione um call-to-action (próximo passo)",
        ],
        tip: "Use storytelling: Situação → Problema → Solução → Resultado.",
        deliverable: "Post de LinkedIn, email ou slide de pitch.",
        principle: "STEPPS: Compartilhável - torne fácil para outros entenderem e falarem sobre.",
    },
    DayContent {
        day: 6,
        theme: "Validação Externa",
        objective: "Compartilhar sua ideia e coletar feedback.",
        checklist: &[
            "Envie para 3 pessoas de confiança",
            "Pergunte: 'O que não ficou claro?'",
            "Anote todas as sugestões sem julgar",
        ],
        tip: "Feedback honesto é mais valioso que elogios vazios.",
        deliverable: "Relatório de feedback com 3 insights principais.",
        principle: "Design: Teste com usuários - valide antes de escalar.",
    },
    DayContent {
        day: 7,
        theme: "Entrega e Reflexão",
        objective: "Finalizar e publicar seu trabalho da semana.",
        checklist: &[
            "Revise e faça ajustes finais",
            "Publique em uma plataforma (opcional)",
        ],
        tip: "Feito é melhor que perfeito. Publique e itere depois.",
        deliverable: "Link público do seu projeto + post de reflexão.",
        principle: "STEPPS: Triggers - crie o hábito de entregar semanalmente.",
    },
];

pub fn day_content(day: DayNumber) -> &'static DayContent {
    &DAYS[day.index()]
}

pub fn checklist_len(day: DayNumber) -> usize {
    day_content(day).checklist.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_lengths() {
        let lens: Vec<usize> = DayNumber::all().map(checklist_len).collect();
        assert_eq!(lens, vec![3, 3, 3, 3, 3, 3, 2]);
    }

    #[test]
    fn content_is_indexed_by_day() {
        for day in DayNumber::all() {
            assert_eq!(day_content(day).day, day.get());
        }
    }
}
